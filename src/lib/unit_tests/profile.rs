// SPDX-License-Identifier: Apache-2.0

use super::new_nic;
use crate::{
    AddrSuffix, BootProtocol, ConnectionConfig, ErrorKind, Hardware,
    InterfaceType, IpAddress, IpConfig, NetworkConfig, NetworkingSection,
    ProfileReader, ReadResult, RenamingMechanism, S390Channels,
    StaticHardware, export,
};

const PROFILE: &str = r#"
interfaces:
  - DEVICE: eth0
    BOOTPROTO: static
    ipaddr: 192.168.1.10
    prefixlen: 24
    startmode: auto
    mtu: 1500
    hostnames: [host1.example.com, host1]
    aliases:
      alias0:
        ipaddr: 10.0.0.5
        prefixlen: 8
        label: zero
  - device: bond0
    bootproto: none
    bonding_master: true
    bonding_slave1: eth2
    bonding_slave0: lan1
    bonding_module_opts: mode=active-backup miimon=100
  - device: eth0.10
    bootproto: dhcp
    etherdevice: eth0
    vlan_id: 10
  - device: eth3
    bootproto: static
    ipaddr: 300.1.1.1
  - bootproto: dhcp
routing:
  ipv4_forward: true
  routes:
    - destination: default
      gateway: 192.168.1.1
    - destination: 10.0.0.0
      gateway: bogus
      netmask: 255.0.0.0
    - destination: 10.20.0.0
      netmask: 255.255.0.0
      gateway: 10.0.0.1
      device: eth0
      extrapara: metric 10
dns:
  hostname: host1
  nameservers: [192.168.1.1, not-an-ip]
  searchlist: example.com
net-udev:
  - name: lan1
    rule: ATTR{address}
    value: 52:54:00:AB:CD:02
  - name: eth9
    rule: DRIVERS
    value: e1000
"#;

fn hardware() -> StaticHardware {
    StaticHardware::new(vec![
        new_nic("eth0", "52:54:00:ab:cd:01", "0000:00:03.0"),
        new_nic("eth1", "52:54:00:ab:cd:02", "0000:00:04.0"),
        new_nic("eth2", "52:54:00:ab:cd:03", "0000:00:05.0"),
        new_nic("eth3", "52:54:00:ab:cd:04", "0000:00:06.0"),
    ])
}

fn import(content: &str, probe: &StaticHardware) -> ReadResult {
    let section = NetworkingSection::from_yaml_str(content).unwrap();
    ProfileReader::new(probe).read(&section).unwrap()
}

#[test]
fn test_import_profile() {
    let result = import(PROFILE, &hardware());
    let config = &result.config;

    assert_eq!(result.issues.len(), 5, "{}", result.issues);
    for location in [
        "interfaces[3]",
        "interfaces[4]",
        "routing.routes[1]",
        "dns",
        "net-udev[1]",
    ] {
        assert!(result.issues.has_location(location), "{location}");
    }

    let eth0 = config.connections.by_name("eth0").unwrap();
    let base = eth0.base_conn();
    assert_eq!(base.bootproto, BootProtocol::Static);
    assert_eq!(
        base.ip.as_ref().unwrap().address.to_string(),
        "192.168.1.10/24"
    );
    assert_eq!(base.ip_aliases.len(), 1);
    assert_eq!(base.ip_aliases[0].id.as_str(), "_0");
    assert_eq!(base.ip_aliases[0].label.as_deref(), Some("zero"));
    assert_eq!(base.mtu, Some(1500));
    assert_eq!(base.hostnames, vec!["host1.example.com", "host1"]);

    let bond = config.connections.by_name("bond0").unwrap();
    assert_eq!(bond.iface_type(), InterfaceType::Bonding);
    assert_eq!(bond.ports(), Some(vec!["lan1", "eth2"]));

    let vlan = config.connections.by_name("eth0.10").unwrap();
    assert_eq!(vlan.iface_type(), InterfaceType::Vlan);
    assert_eq!(vlan.parent(), Some("eth0"));

    // Invalid address dropped, connection kept
    let eth3 = config.connections.by_name("eth3").unwrap();
    assert!(eth3.base_conn().ip.is_none());

    let lan1 = config.interfaces.by_name("lan1").unwrap();
    assert_eq!(lan1.old_name.as_deref(), Some("eth1"));
    assert_eq!(lan1.renaming_mechanism, RenamingMechanism::Mac);
    assert!(config.interfaces.by_name("bond0").unwrap().is_virtual());

    assert!(config.routing.forward_ipv4);
    assert!(!config.routing.forward_ipv6);
    assert_eq!(config.routing.routes().count(), 2);
    let routes = config.routing.iface_routes("eth0");
    assert_eq!(routes.len(), 1);
    assert_eq!(
        routes[0].to_sysconfig_line(),
        "10.20.0.0/16 10.0.0.1 - eth0 metric 10"
    );

    assert_eq!(config.dns.nameservers, vec!["192.168.1.1"]);
    assert_eq!(config.dns.searchlist, vec!["example.com"]);
    assert_eq!(config.dns.hostname.as_deref(), Some("host1"));
}

#[test]
fn test_import_duplicate_device() {
    let result = import(
        r#"
        interfaces:
          - device: eth0
            bootproto: dhcp
          - device: eth0
            bootproto: static
        "#,
        &hardware(),
    );
    assert_eq!(result.config.connections.len(), 1);
    assert!(result.config.connections.by_name("eth0").unwrap().is_dhcp());
    assert!(result.issues.has_location("interfaces[1]"));
}

#[test]
fn test_import_s390_devices() {
    let mut qeth = Hardware::new("eth4");
    qeth.iface_type = Some(InterfaceType::Qeth);
    qeth.channels =
        Some(S390Channels::new("0.0.0700", "0.0.0701", Some("0.0.0702")));
    let probe = StaticHardware::new(vec![qeth]);

    let result = import(
        r#"
        interfaces:
          - device: eth4
            bootproto: dhcp
          - device: eth5
            bootproto: dhcp
            interfacetype: qeth
        s390-devices:
          - type: qeth
            chanids: 0.0.0700 0.0.0701 0.0.0702
            layer2: true
            portno: 1
          - type: qeth
            chanids: 0.0.0800:0.0.0801:0.0.0802
          - type: lcs
            chanids: 0.0.0900:0.0.0901
          - type: foo
            chanids: 0.0.0a00:0.0.0a01
        "#,
        &probe,
    );

    let Some(ConnectionConfig::Qeth(eth4)) =
        result.config.connections.by_name("eth4")
    else {
        panic!("Expecting qeth connection eth4");
    };
    assert!(eth4.layer2);
    assert_eq!(eth4.port_number, Some(1));
    assert_eq!(eth4.channels.to_chanids(), "0.0.0700:0.0.0701:0.0.0702");

    let Some(ConnectionConfig::Qeth(eth5)) =
        result.config.connections.by_name("eth5")
    else {
        panic!("Expecting qeth connection eth5");
    };
    assert_eq!(eth5.channels.to_chanids(), "0.0.0800:0.0.0801:0.0.0802");
    assert!(!eth5.layer2);
    assert!(!result.config.interfaces.by_name("eth5").unwrap().is_virtual());

    assert_eq!(result.issues.len(), 2, "{}", result.issues);
    assert!(result.issues.has_location("s390-devices[2]"));
    assert!(result.issues.has_location("s390-devices[3]"));
}

#[test]
fn test_export_then_import() {
    let probe = hardware();
    let first = import(PROFILE, &probe).config;

    let section = export(&first);
    assert_eq!(section.interfaces.len(), first.connections.len());
    assert_eq!(section.net_udev.len(), 1);
    let yaml = serde_yaml::to_string(&section).unwrap();

    let second = import(&yaml, &probe);
    assert!(second.issues.is_empty(), "{}", second.issues);
    let config = second.config;
    for conn in first.connections.iter() {
        assert_eq!(
            config.connections.by_name(conn.name()),
            Some(conn),
            "connection {} differs",
            conn.name()
        );
    }
    assert_eq!(config.connections.len(), first.connections.len());
    assert_eq!(config.routing, first.routing);
    assert_eq!(config.dns, first.dns);
    assert_eq!(
        config.interfaces.by_name("lan1").unwrap().renaming_mechanism,
        RenamingMechanism::Mac
    );
}

#[test]
fn test_secrets_hidden_in_display() {
    let section = NetworkingSection::from_yaml_str(
        r#"
        interfaces:
          - device: wlan0
            wireless_mode: managed
            wireless_auth_mode: psk
            wireless_wpa_psk: very-secret
        "#,
    )
    .unwrap();
    assert_eq!(
        section.interfaces[0].wireless_wpa_psk.as_deref(),
        Some("very-secret")
    );
    assert!(!section.to_string().contains("very-secret"));
}

#[test]
fn test_invalid_section() {
    let result = NetworkingSection::from_yaml_str("interfaces: 5\n");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_alias_suffix_kept_through_export() {
    let mut config = NetworkConfig::new();
    let mut eth0 =
        ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap();
    let base = eth0.base_conn_mut();
    base.bootproto = BootProtocol::Static;
    base.ip = Some(IpConfig::new("192.168.1.10/24".parse().unwrap()));
    for (suffix, address) in [("_1", "10.0.0.5/8"), ("foo", "10.1.0.5/16")] {
        base.ip_aliases.push(IpConfig::new_alias(
            address.parse::<IpAddress>().unwrap(),
            AddrSuffix::from(suffix),
        ));
    }
    config.add_connection(eth0);

    let section = export(&config);
    let names: Vec<&str> = section.interfaces[0]
        .aliases
        .keys()
        .map(|k| k.as_str())
        .collect();
    assert_eq!(names, vec!["alias1", "foo"]);

    let yaml = serde_yaml::to_string(&section).unwrap();
    let result = import(&yaml, &hardware());
    assert!(result.issues.is_empty(), "{}", result.issues);
    let eth0 = result.config.connections.by_name("eth0").unwrap();
    assert_eq!(
        eth0.base_conn().ip_aliases,
        config.connections.by_name("eth0").unwrap().base_conn().ip_aliases
    );
}
