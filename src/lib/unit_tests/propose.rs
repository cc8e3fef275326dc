// SPDX-License-Identifier: Apache-2.0

use crate::{
    ConnectionConfig, Hardware, InterfaceType, IpAddress, ProposeContext,
    Startmode,
};

fn new_conn(iface_type: InterfaceType, name: &str) -> ConnectionConfig {
    ConnectionConfig::new(iface_type, name).unwrap()
}

fn laptop_ctx() -> ProposeContext {
    ProposeContext {
        laptop: true,
        default_startmode: Startmode::Ifplugd { priority: Some(10) },
        ..Default::default()
    }
}

#[test]
fn test_propose_ifplugd_on_laptop() {
    let mut conn = new_conn(InterfaceType::Ethernet, "eth0");
    conn.propose(&laptop_ctx(), None);
    assert_eq!(
        conn.base_conn().startmode,
        Some(Startmode::Ifplugd { priority: Some(10) })
    );
}

#[test]
fn test_propose_virtual_never_ifplugd() {
    let mut conn = new_conn(InterfaceType::Bonding, "bond0");
    conn.propose(&laptop_ctx(), None);
    assert_eq!(conn.base_conn().startmode, Some(Startmode::Auto));
    if let ConnectionConfig::Bonding(bond) = &conn {
        assert!(bond.options.is_some());
    } else {
        panic!("Expecting bonding connection, got {conn:?}");
    }
}

#[test]
fn test_propose_hotplug_device() {
    let ctx = ProposeContext {
        default_startmode: Startmode::Ifplugd { priority: Some(0) },
        ..Default::default()
    };
    let mut hw = Hardware::new("eth5");
    hw.hotplug = true;
    let mut conn = new_conn(InterfaceType::Ethernet, "eth5");
    conn.propose(&ctx, Some(&hw));
    assert_eq!(conn.base_conn().startmode, Some(Startmode::Hotplug));
}

#[test]
fn test_propose_root_on_network() {
    let ctx = ProposeContext {
        root_on_network: true,
        ..laptop_ctx()
    };
    let mut conn = new_conn(InterfaceType::Ethernet, "eth0");
    conn.propose(&ctx, None);
    assert_eq!(conn.base_conn().startmode, Some(Startmode::Nfsroot));
}

#[test]
fn test_propose_vlan_from_name() {
    let mut conn = new_conn(InterfaceType::Vlan, "eth0.42");
    conn.propose(&ProposeContext::default(), None);
    assert_eq!(conn.parent(), Some("eth0"));
    if let ConnectionConfig::Vlan(vlan) = &conn {
        assert_eq!(vlan.vlan_id, Some(42));
    }
}

#[test]
fn test_propose_loopback_address() {
    let mut conn = new_conn(InterfaceType::Loopback, "lo");
    conn.propose(&ProposeContext::default(), None);
    assert_eq!(
        conn.base_conn().ip.as_ref().map(|ip| ip.address),
        Some("127.0.0.1/8".parse::<IpAddress>().unwrap())
    );
}
