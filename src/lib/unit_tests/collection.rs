// SPDX-License-Identifier: Apache-2.0

use crate::{
    ConnectionConfig, ConnectionConfigsCollection, ErrorKind, Hardware,
    Interface, InterfaceType, InterfacesCollection, NetworkConfig,
    RenamingMechanism,
};

#[test]
fn test_duplicate_interface_rejected() {
    let mut ifaces = InterfacesCollection::new();
    ifaces
        .push(Interface::new_physical(Hardware::new("eth0")))
        .unwrap();
    let result =
        ifaces.push(Interface::new_unprobed("eth0", InterfaceType::Qeth));

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Duplicate);
    assert_eq!(ifaces.len(), 1);
    assert_eq!(
        ifaces.by_name("eth0").unwrap().iface_type,
        InterfaceType::Ethernet
    );
}

#[test]
fn test_duplicate_interface_in_yaml_rejected() {
    let result = serde_yaml::from_str::<InterfacesCollection>(
        r#"
        - name: eth0
          type: ethernet
        - name: eth0
          type: ethernet
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_ids_assigned_and_kept_by_clone() {
    let mut conns = ConnectionConfigsCollection::new();
    let id0 = conns.add(
        ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap(),
    );
    let id1 = conns
        .add(ConnectionConfig::new(InterfaceType::Bonding, "bond0").unwrap());

    assert!(id0.is_assigned());
    assert!(id1.is_assigned());
    assert_ne!(id0, id1);

    let copy = conns.clone();
    assert_eq!(copy.by_name("eth0").unwrap().id(), id0);
    assert_eq!(copy.by_name("bond0").unwrap().id(), id1);
    assert_eq!(copy, conns);
}

#[test]
fn test_id_kept_on_rename() {
    let mut config = NetworkConfig::new();
    config
        .interfaces
        .push(Interface::new_physical(Hardware::new("eth0")))
        .unwrap();
    let id = config.add_connection(
        ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap(),
    );

    config
        .rename_interface("eth0", "lan0", RenamingMechanism::None)
        .unwrap();

    let conn = config.connections.by_id(id).unwrap();
    assert_eq!(conn.name(), "lan0");
    assert_eq!(conn.iface_name(), "lan0");
    assert!(config.connections.by_name("eth0").is_none());
}

#[test]
fn test_equality_ignores_id() {
    let mut a = ConnectionConfigsCollection::new();
    let mut b = ConnectionConfigsCollection::new();
    b.add(ConnectionConfig::new(InterfaceType::Dummy, "dummy1").unwrap());
    b.add(ConnectionConfig::new(InterfaceType::Dummy, "dummy0").unwrap());
    a.add(ConnectionConfig::new(InterfaceType::Dummy, "dummy0").unwrap());

    let a0 = a.by_name("dummy0").unwrap();
    let b0 = b.by_name("dummy0").unwrap();
    assert_ne!(a0.id(), b0.id());
    assert_eq!(a0, b0);
}

#[test]
fn test_add_or_update_by_id() {
    let mut conns = ConnectionConfigsCollection::new();
    let id = conns
        .add(ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap());
    let mut conn = conns.by_id(id).unwrap().clone();
    conn.base_conn_mut().mtu = Some(9000);

    assert_eq!(conns.add_or_update(conn), id);
    assert_eq!(conns.len(), 1);
    assert_eq!(conns.by_id(id).unwrap().base_conn().mtu, Some(9000));
}

#[test]
fn test_select_views() {
    let mut conns = ConnectionConfigsCollection::new();
    conns.add(ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap());
    conns.add(ConnectionConfig::new(InterfaceType::Bonding, "bond0").unwrap());
    conns.add(ConnectionConfig::new(InterfaceType::Vlan, "eth0.10").unwrap());

    assert_eq!(conns.bonding().len(), 1);
    assert_eq!(conns.vlans()[0].name(), "eth0.10");
    assert!(conns.bridges().is_empty());
    assert_eq!(conns.select(|c| c.is_virtual()).len(), 2);
}

#[test]
fn test_delete_connection_removes_virtual_iface() {
    let mut config = NetworkConfig::new();
    let id = config.add_connection(
        ConnectionConfig::new(InterfaceType::Bridge, "br0").unwrap(),
    );
    assert!(config.interfaces.by_name("br0").unwrap().is_virtual());

    config.delete_connection(id).unwrap();

    assert!(config.interfaces.by_name("br0").is_none());
    assert!(config.connections.is_empty());
}

#[test]
fn test_free_name() {
    let mut ifaces = InterfacesCollection::new();
    for name in ["eth0", "eth1", "eth3"] {
        ifaces
            .push(Interface::new_physical(Hardware::new(name)))
            .unwrap();
    }
    assert_eq!(ifaces.free_name("eth"), "eth2");
    assert_eq!(ifaces.free_name("wlan"), "wlan0");
}

#[test]
fn test_find_parent_and_remove_by_name() {
    let mut conns = ConnectionConfigsCollection::new();
    let mut bond = ConnectionConfig::new(InterfaceType::Bonding, "bond0")
        .unwrap();
    if let ConnectionConfig::Bonding(b) = &mut bond {
        b.slaves = vec!["eth1".to_string(), "eth2".to_string()];
    }
    conns.add(bond);
    conns.add(ConnectionConfig::new(InterfaceType::Ethernet, "eth1").unwrap());
    conns.add(ConnectionConfig::new(InterfaceType::Ethernet, "eth3").unwrap());

    let eth1 = conns.by_name("eth1").unwrap();
    assert_eq!(eth1.find_parent(&conns).map(|c| c.name()), Some("bond0"));
    assert!(conns.by_name("eth3").unwrap().find_parent(&conns).is_none());

    let removed = conns.remove_by_name("bond0").unwrap();
    assert_eq!(removed.iface_type(), InterfaceType::Bonding);
    assert!(conns.by_name("eth1").unwrap().find_parent(&conns).is_none());
    assert!(conns.remove_by_name("bond0").is_none());
}

#[test]
fn test_physical_and_virtual_views() {
    let mut config = NetworkConfig::new();
    config
        .interfaces
        .push(Interface::new_physical(Hardware::new("eth0")))
        .unwrap();
    config.add_connection(
        ConnectionConfig::new(InterfaceType::Dummy, "dummy0").unwrap(),
    );

    let virtuals = config.interfaces.virtuals();
    assert_eq!(virtuals.len(), 1);
    assert_eq!(virtuals[0].name, "dummy0");
    assert_eq!(config.interfaces.physical()[0].name, "eth0");
}

#[test]
fn test_interface_default() {
    let iface = Interface::default();
    assert_eq!(iface.iface_type, InterfaceType::Ethernet);
    assert!(iface.is_physical());
    assert_eq!(iface.renaming_mechanism, RenamingMechanism::None);
}
