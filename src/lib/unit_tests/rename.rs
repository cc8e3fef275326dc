// SPDX-License-Identifier: Apache-2.0

use super::new_nic;
use crate::{
    BondingConnection, ConnectionConfig, ErrorKind, Interface, InterfaceType,
    NetworkConfig, RenamingMechanism, Route, RouteInterface,
};

fn config_with_nics() -> NetworkConfig {
    let mut config = NetworkConfig::new();
    for (name, mac, busid) in [
        ("eth0", "00:11:22:33:44:00", "0000:00:03.0"),
        ("eth1", "00:11:22:33:44:01", "0000:00:04.0"),
        ("eth2", "00:11:22:33:44:02", "0000:00:05.0"),
    ] {
        config
            .interfaces
            .push(Interface::new_physical(new_nic(name, mac, busid)))
            .unwrap();
    }
    config
}

#[test]
fn test_rename_collision_moves_existing_iface() {
    let mut config = config_with_nics();
    config.interfaces.remove("eth2");
    config.interfaces.by_name_mut("eth0").unwrap().renaming_mechanism =
        RenamingMechanism::BusId;
    let eth0_id = config.add_connection(
        ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap(),
    );
    let eth1_id = config.add_connection(
        ConnectionConfig::new(InterfaceType::Ethernet, "eth1").unwrap(),
    );
    config.routing.add_route(
        Route::from_sysconfig_line("10.0.0.0/8 - - eth0", None)
            .unwrap()
            .unwrap(),
    );

    config
        .rename_interface("eth1", "eth0", RenamingMechanism::Mac)
        .unwrap();

    let moved = config.interfaces.by_name("eth2").unwrap();
    assert_eq!(moved.mac(), Some("00:11:22:33:44:00"));
    assert_eq!(moved.renaming_mechanism, RenamingMechanism::BusId);
    let renamed = config.interfaces.by_name("eth0").unwrap();
    assert_eq!(renamed.mac(), Some("00:11:22:33:44:01"));
    assert_eq!(renamed.renaming_mechanism, RenamingMechanism::Mac);
    assert!(config.interfaces.by_name("eth1").is_none());

    assert_eq!(config.connections.by_id(eth0_id).unwrap().name(), "eth2");
    assert_eq!(config.connections.by_id(eth1_id).unwrap().name(), "eth0");
    assert_eq!(config.routing.iface_routes("eth2").len(), 1);
    assert!(config.routing.iface_routes("eth0").is_empty());
}

#[test]
fn test_rename_updates_ports_and_parent() {
    let mut config = config_with_nics();
    let mut bond = BondingConnection::new("bond0");
    bond.slaves = vec!["eth1".to_string(), "eth2".to_string()];
    config.add_connection(ConnectionConfig::Bonding(Box::new(bond)));
    let mut vlan = ConnectionConfig::new(InterfaceType::Vlan, "vlan5").unwrap();
    if let ConnectionConfig::Vlan(v) = &mut vlan {
        v.parent_device = Some("eth1".to_string());
    }
    config.add_connection(vlan);

    config
        .rename_interface("eth1", "lan1", RenamingMechanism::BusId)
        .unwrap();

    let bond = config.connections.by_name("bond0").unwrap();
    assert_eq!(bond.ports(), Some(vec!["lan1", "eth2"]));
    assert_eq!(
        config.connections.by_name("vlan5").unwrap().parent(),
        Some("lan1")
    );
    assert_eq!(
        config.interfaces.by_name("lan1").unwrap().old_name.as_deref(),
        Some("eth1")
    );
}

#[test]
fn test_rename_virtual_iface_drops_mechanism() {
    let mut config = NetworkConfig::new();
    config.add_connection(
        ConnectionConfig::new(InterfaceType::Dummy, "dummy0").unwrap(),
    );
    config
        .rename_interface("dummy0", "dummy5", RenamingMechanism::Mac)
        .unwrap();
    assert_eq!(
        config.interfaces.by_name("dummy5").unwrap().renaming_mechanism,
        RenamingMechanism::None
    );
}

#[test]
fn test_rename_missing_iface() {
    let mut config = config_with_nics();
    let result =
        config.rename_interface("eth9", "eth0", RenamingMechanism::Mac);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_bonding_port_mac_renaming_fixed() {
    let mut config = config_with_nics();
    config.interfaces.by_name_mut("eth1").unwrap().renaming_mechanism =
        RenamingMechanism::Mac;
    config.interfaces.by_name_mut("eth2").unwrap().renaming_mechanism =
        RenamingMechanism::BusId;
    let mut bond = BondingConnection::new("bond0");
    bond.slaves = vec!["eth1".to_string(), "eth2".to_string()];
    config.add_connection(ConnectionConfig::Bonding(Box::new(bond)));

    assert_eq!(config.bond_ports_using_mac_renaming(), vec!["eth1"]);

    assert_eq!(config.fix_bond_ports_renaming(), vec!["eth1".to_string()]);
    assert_eq!(
        config.interfaces.by_name("eth1").unwrap().renaming_mechanism,
        RenamingMechanism::BusId
    );
    assert!(config.bond_ports_using_mac_renaming().is_empty());
}

#[test]
fn test_route_link_after_rename() {
    let mut config = config_with_nics();
    config.routing.add_route(
        Route::from_sysconfig_line("default 10.0.0.1 - eth0", None)
            .unwrap()
            .unwrap(),
    );
    config.routing.link(&config.interfaces);
    assert_eq!(
        config.routing.routes().next().unwrap().interface,
        RouteInterface::Linked("eth0".to_string())
    );

    config
        .rename_interface("eth0", "lan0", RenamingMechanism::Mac)
        .unwrap();
    assert_eq!(
        config.routing.routes().next().unwrap().iface_name(),
        Some("lan0")
    );
}
