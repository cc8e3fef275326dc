// SPDX-License-Identifier: Apache-2.0

use std::{path::Path, str::FromStr};

use super::{new_nic, read_file, write_file};
use crate::{
    AddrSuffix, BondingConnection, BootProtocol, BridgeConnection,
    ConnectionConfig, Hardware, InfinibandMode, InterfaceType, IpAddress,
    IpConfig, NetworkConfig, QethConnection, Reader, RenamingMechanism, Route,
    S390Channels, StaticHardware, Startmode, SysnetConfig, TunTapConnection,
    TunTapMode, VlanConnection, WirelessAuthMode, WirelessConnection, Writer,
    merge_files,
    sysconfig::{HostsFile, KeyValueFile, KeyValueStyle},
};

const IFCFG_ETH0: &str = "etc/sysconfig/network/ifcfg-eth0";
const IFROUTE_ETH0: &str = "etc/sysconfig/network/ifroute-eth0";
const ROUTES: &str = "etc/sysconfig/network/routes";
const NETWORK_CONFIG: &str = "etc/sysconfig/network/config";
const UDEV_RULES: &str = "etc/udev/rules.d/70-persistent-net.rules";
const SYSCTL: &str = "etc/sysctl.d/70-yast.conf";

fn hardware() -> StaticHardware {
    let mut qeth = Hardware::new("eth4");
    qeth.iface_type = Some(InterfaceType::Qeth);
    qeth.busid = Some("0.0.0700".to_string());
    qeth.channels =
        Some(S390Channels::new("0.0.0700", "0.0.0701", Some("0.0.0702")));
    let mut ib = Hardware::new("ib0");
    ib.iface_type = Some(InterfaceType::Infiniband);
    StaticHardware::new(vec![
        new_nic("eth0", "00:11:22:33:44:55", "0000:00:03.0"),
        new_nic("eth1", "00:11:22:33:44:56", "0000:00:04.0"),
        new_nic("eth2", "00:11:22:33:44:57", "0000:00:05.0"),
        new_nic("eth3", "00:11:22:33:44:58", "0000:00:06.0"),
        qeth,
        ib,
    ])
}

fn read(root: &Path) -> crate::ReadResult {
    let conf = SysnetConfig::new(root);
    let probe = hardware();
    Reader::new(&conf, &probe).read().unwrap()
}

fn sorted_pairs(content: &str) -> Vec<(String, String)> {
    let file = KeyValueFile::parse(content, KeyValueStyle::Sysconfig);
    let mut ret: Vec<(String, String)> = file
        .pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ret.sort_unstable();
    ret
}

/// One connection of every type stored in sysconfig.
fn full_config() -> NetworkConfig {
    let mut config = NetworkConfig::new();
    for hw in hardware().0 {
        config
            .interfaces
            .push(crate::Interface::new_physical(hw))
            .unwrap();
    }

    let mut eth0 =
        ConnectionConfig::new(InterfaceType::Ethernet, "eth0").unwrap();
    let base = eth0.base_conn_mut();
    base.startmode = Some(Startmode::Ifplugd { priority: Some(5) });
    base.ip = Some(IpConfig::new(
        IpAddress::from_str("192.168.1.10/24").unwrap(),
    ));
    let mut alias = IpConfig::new_alias(
        IpAddress::from_str("10.0.0.5/8").unwrap(),
        AddrSuffix::from("_1"),
    );
    alias.label = Some("one".to_string());
    base.ip_aliases.push(alias);
    base.mtu = Some(1500);
    base.firewall_zone = Some("public".to_string());
    base.ethtool_options = Some("-K eth0 tso off".to_string());
    base.hostnames = vec!["host1.example.com".to_string(), "host1".to_string()];
    config.add_connection(eth0);

    let mut bond = BondingConnection::new("bond0");
    bond.base.bootproto = BootProtocol::None;
    bond.slaves = vec!["eth2".to_string(), "eth3".to_string()];
    bond.options = Some("mode=active-backup miimon=100".to_string());
    config.add_connection(ConnectionConfig::Bonding(Box::new(bond)));

    let mut br = BridgeConnection::new("br0");
    br.base.bootproto = BootProtocol::Dhcp;
    br.ports = vec!["eth1".to_string()];
    br.stp = true;
    br.forward_delay = Some(15);
    config.add_connection(ConnectionConfig::Bridge(Box::new(br)));

    let mut vlan = VlanConnection::new("eth0.10");
    vlan.base.bootproto = BootProtocol::Dhcp4;
    vlan.parent_device = Some("eth0".to_string());
    vlan.vlan_id = Some(10);
    config.add_connection(ConnectionConfig::Vlan(Box::new(vlan)));

    let mut wlan = WirelessConnection::new("wlan0");
    wlan.base.bootproto = BootProtocol::Dhcp;
    wlan.mode = Some("managed".to_string());
    wlan.essid = Some("home".to_string());
    wlan.auth_mode = Some(WirelessAuthMode::SharedKey);
    wlan.keys = vec!["s3cret".to_string()];
    wlan.default_key = Some(0);
    config.add_connection(ConnectionConfig::Wireless(Box::new(wlan)));

    let mut tap = TunTapConnection::new("tap0", TunTapMode::Tap);
    tap.owner = Some("root".to_string());
    config.add_connection(ConnectionConfig::TunTap(Box::new(tap)));

    let mut ib =
        ConnectionConfig::new(InterfaceType::Infiniband, "ib0").unwrap();
    if let ConnectionConfig::Infiniband(c) = &mut ib {
        c.ipoib_mode = Some(InfinibandMode::Connected);
    }
    config.add_connection(ib);

    let mut qeth = QethConnection::new("eth4");
    qeth.channels = S390Channels::new("0.0.0700", "0.0.0701", Some("0.0.0702"));
    config.add_connection(ConnectionConfig::Qeth(Box::new(qeth)));

    config.add_connection(
        ConnectionConfig::new(InterfaceType::Dummy, "dummy0").unwrap(),
    );
    let mut lo = ConnectionConfig::new(InterfaceType::Loopback, "lo").unwrap();
    lo.base_conn_mut().ip =
        Some(IpConfig::new(IpAddress::from_str("127.0.0.1/8").unwrap()));
    config.add_connection(lo);

    config.routing.add_route(
        Route::from_sysconfig_line("default 192.168.1.1 - -", None)
            .unwrap()
            .unwrap(),
    );
    config.routing.add_route(
        Route::from_sysconfig_line("10.10.0.0/16 10.0.0.1 - eth0", None)
            .unwrap()
            .unwrap(),
    );
    config.routing.link(&config.interfaces);
    config.routing.forward_ipv4 = true;
    config.dns.hostname = Some("host1".to_string());
    config.dns.nameservers = vec!["192.168.1.1".to_string()];
    config.dns.searchlist = vec!["example.com".to_string()];
    config
}

#[test]
fn test_read_static_eth0() {
    let dir = tempfile::tempdir().unwrap();
    let content = "BOOTPROTO='static'\nIPADDR='192.168.1.10'\n\
                   PREFIXLEN='24'\nSTARTMODE='auto'\n";
    write_file(dir.path(), IFCFG_ETH0, content);

    let result = read(dir.path());
    assert!(result.issues.is_empty());
    let conn = result.config.connections.by_name("eth0").unwrap();
    assert_eq!(conn.iface_type(), InterfaceType::Ethernet);
    let base = conn.base_conn();
    assert_eq!(
        base.ip.as_ref().unwrap().address.to_string(),
        "192.168.1.10/24"
    );
    assert_eq!(base.startmode.unwrap().name(), "auto");
    assert_eq!(base.bootproto, BootProtocol::Static);

    let out = tempfile::tempdir().unwrap();
    let conf = SysnetConfig::new(out.path());
    Writer::new(&conf).write(&result.config, None).unwrap();
    assert_eq!(
        sorted_pairs(&read_file(out.path(), IFCFG_ETH0)),
        sorted_pairs(content)
    );
}

#[test]
fn test_round_trip_every_type() {
    let dir = tempfile::tempdir().unwrap();
    let config = full_config();
    let conf = SysnetConfig::new(dir.path());
    let summary = Writer::new(&conf).write(&config, None).unwrap();
    assert!(summary.removed.is_empty());

    let result = read(dir.path());
    assert!(result.issues.is_empty(), "{}", result.issues);
    assert_eq!(result.config.connections.len(), config.connections.len());
    for conn in config.connections.iter() {
        assert_eq!(
            result.config.connections.by_name(conn.name()),
            Some(conn),
            "connection {} differs",
            conn.name()
        );
    }
    let routes: Vec<&Route> = result.config.routing.routes().collect();
    assert_eq!(routes.len(), 2);
    assert!(result.config.routing.forward_ipv4);
    assert!(!result.config.routing.forward_ipv6);
    assert_eq!(result.config.dns, config.dns);
}

#[test]
fn test_dummy_gets_interfacetype() {
    let dir = tempfile::tempdir().unwrap();
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&full_config(), None).unwrap();
    let dummy = read_file(dir.path(), "etc/sysconfig/network/ifcfg-dummy0");
    assert!(dummy.contains("INTERFACETYPE='dummy'"));
    let eth0 = read_file(dir.path(), IFCFG_ETH0);
    assert!(!eth0.contains("INTERFACETYPE"));
    assert!(eth0.contains("IPADDR_1='10.0.0.5'"));
    assert!(eth0.contains("LABEL_1='one'"));
}

#[test]
fn test_write_same_snapshot_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&full_config(), None).unwrap();

    let result = read(dir.path());
    let writer = Writer::new(&conf);
    assert!(
        writer
            .write(&result.config, Some(&result.config))
            .unwrap()
            .is_empty()
    );
    // Full export of unchanged state leaves every file as is.
    assert!(writer.write(&result.config, None).unwrap().is_empty());
}

#[test]
fn test_ifroute_removed_when_no_routes() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), IFCFG_ETH0, "BOOTPROTO='dhcp'\n");
    write_file(dir.path(), IFROUTE_ETH0, "10.2.0.0/24 192.168.1.254 - -\n");

    let old = read(dir.path()).config;
    assert_eq!(old.routing.iface_routes("eth0").len(), 1);
    let mut new = old.clone();
    new.routing.remove_iface_routes("eth0");

    let conf = SysnetConfig::new(dir.path());
    let summary = Writer::new(&conf).write(&new, Some(&old)).unwrap();
    assert_eq!(summary.removed, vec![dir.path().join(IFROUTE_ETH0)]);
    assert!(summary.written.is_empty());
    assert!(!dir.path().join(IFROUTE_ETH0).exists());
}

#[test]
fn test_ifroute_of_unconfigured_device_moved_to_routes() {
    let dir = tempfile::tempdir().unwrap();
    let ifroute_eth9 = "etc/sysconfig/network/ifroute-eth9";
    write_file(dir.path(), IFCFG_ETH0, "BOOTPROTO='dhcp'\n");
    write_file(dir.path(), ifroute_eth9, "10.30.0.0/24 10.0.0.1 - -\n");
    let conf = SysnetConfig::new(dir.path());

    let old = read(dir.path()).config;
    assert!(
        Writer::new(&conf)
            .write(&old, Some(&old))
            .unwrap()
            .is_empty()
    );
    assert!(dir.path().join(ifroute_eth9).exists());

    let mut new = old.clone();
    new.routing.add_route(
        Route::from_sysconfig_line("default 10.0.0.254 - -", None)
            .unwrap()
            .unwrap(),
    );
    let summary = Writer::new(&conf).write(&new, Some(&old)).unwrap();

    assert_eq!(summary.removed, vec![dir.path().join(ifroute_eth9)]);
    assert_eq!(
        read_file(dir.path(), ROUTES),
        "10.30.0.0/24 10.0.0.1 - eth9\ndefault 10.0.0.254 - -\n"
    );
    let config = read(dir.path()).config;
    assert_eq!(config.routing.routes().count(), 2);
    assert_eq!(config.routing.iface_routes("eth9").len(), 1);
}

#[test]
fn test_route_files_split() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = full_config();
    config.routing.add_route(
        Route::from_sysconfig_line("10.20.0.0/16 - - eth9", None)
            .unwrap()
            .unwrap(),
    );
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&config, None).unwrap();

    assert_eq!(
        read_file(dir.path(), ROUTES),
        "default 192.168.1.1 - -\n10.20.0.0/16 - - eth9\n"
    );
    assert_eq!(
        read_file(dir.path(), IFROUTE_ETH0),
        "10.10.0.0/16 10.0.0.1 - eth0\n"
    );
}

#[test]
fn test_delete_and_rename_connection_files() {
    let dir = tempfile::tempdir().unwrap();
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&full_config(), None).unwrap();
    let old = read(dir.path()).config;

    let mut new = old.clone();
    let tap_id = new.connections.by_name("tap0").unwrap().id();
    new.delete_connection(tap_id).unwrap();
    new.rename_interface("eth0", "lan0", RenamingMechanism::Mac)
        .unwrap();
    let summary = Writer::new(&conf).write(&new, Some(&old)).unwrap();

    let sysconfig_dir = conf.sysconfig_dir();
    for removed in ["ifcfg-tap0", "ifcfg-eth0", "ifroute-eth0"] {
        assert!(summary.removed.contains(&sysconfig_dir.join(removed)));
    }
    for written in ["ifcfg-lan0", "ifroute-lan0", "ifcfg-eth0.10"] {
        assert!(summary.written.contains(&sysconfig_dir.join(written)));
    }
    let vlan = read_file(dir.path(), "etc/sysconfig/network/ifcfg-eth0.10");
    assert!(vlan.contains("ETHERDEVICE='lan0'"));
    let rules = read_file(dir.path(), UDEV_RULES);
    assert!(
        rules.contains("ATTR{address}==\"00:11:22:33:44:55\", NAME=\"lan0\"")
    );
}

#[test]
fn test_udev_rules_read_and_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        UDEV_RULES,
        "# managed\n\
         SUBSYSTEM==\"net\", ACTION==\"add\", DRIVERS==\"?*\", \
         ATTR{address}==\"00:11:22:33:44:55\", ATTR{type}==\"1\", \
         NAME=\"lan0\"\n\
         SUBSYSTEM==\"net\", ACTION==\"add\", \
         KERNELS==\"0000:00:99.0\", NAME=\"eth9\"\n\
         SUBSYSTEM==\"net\", NAME=\"broken\"\n",
    );
    write_file(
        dir.path(),
        "etc/sysconfig/network/ifcfg-lan0",
        "BOOTPROTO='dhcp'\n",
    );

    let result = read(dir.path());
    let rules_path = dir.path().join(UDEV_RULES).display().to_string();
    assert!(result.issues.has_location(&rules_path));
    let old = result.config;
    let lan0 = old.interfaces.by_name("lan0").unwrap();
    assert_eq!(lan0.old_name.as_deref(), Some("eth0"));
    assert_eq!(lan0.renaming_mechanism, RenamingMechanism::Mac);
    assert!(old.interfaces.by_name("eth0").is_none());
    assert!(old.connections.by_interface("lan0").is_some());

    let mut new = old.clone();
    new.interfaces.by_name_mut("lan0").unwrap().renaming_mechanism =
        RenamingMechanism::BusId;
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&new, Some(&old)).unwrap();

    let rules = read_file(dir.path(), UDEV_RULES);
    assert!(rules.contains("KERNELS==\"0000:00:03.0\", NAME=\"lan0\""));
    // Rule of device not present is kept
    assert!(rules.contains("KERNELS==\"0000:00:99.0\", NAME=\"eth9\""));
    assert!(!rules.contains("00:11:22:33:44:55"));
}

#[test]
fn test_broken_files_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), IFCFG_ETH0, "BOOTPROTO='dhcp'\nMTU='big'\n");
    write_file(
        dir.path(),
        "etc/sysconfig/network/ifcfg-foo0",
        "INTERFACETYPE='bogus'\n",
    );
    write_file(
        dir.path(),
        "etc/sysconfig/network/ifcfg-eth1.bak",
        "BOOTPROTO='static'\n",
    );
    write_file(dir.path(), ROUTES, "default 10.0.0.1 - -\nbad route\n");

    let result = read(dir.path());
    let config = &result.config;
    assert_eq!(config.connections.len(), 1);
    assert_eq!(
        config.connections.by_name("eth0").unwrap().base_conn().mtu,
        None
    );
    assert!(result.issues.has_location("ifcfg-eth0"));
    assert!(result.issues.has_location("ifcfg-foo0"));
    assert!(
        result
            .issues
            .has_location(&dir.path().join(ROUTES).display().to_string())
    );
    assert_eq!(config.routing.routes().count(), 1);
}

#[test]
fn test_hosts_and_dns() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "etc/hosts",
        "# static table\n127.0.0.1\tlocalhost\n192.168.1.10\told-name\n",
    );
    write_file(
        dir.path(),
        NETWORK_CONFIG,
        "## Comment kept\nNETCONFIG_MODULES_ORDER='dns-resolver'\n",
    );
    let conf = SysnetConfig::new(dir.path());
    Writer::new(&conf).write(&full_config(), None).unwrap();

    let hosts = HostsFile::parse(&read_file(dir.path(), "etc/hosts"));
    assert_eq!(hosts.names("127.0.0.1"), vec!["localhost".to_string()]);
    assert_eq!(
        hosts.names("192.168.1.10"),
        vec!["host1.example.com".to_string(), "host1".to_string()]
    );

    let network_config = read_file(dir.path(), NETWORK_CONFIG);
    assert!(network_config.starts_with("## Comment kept\n"));
    assert!(network_config.contains("NETCONFIG_MODULES_ORDER='dns-resolver'"));
    assert!(
        network_config.contains("NETCONFIG_DNS_STATIC_SERVERS='192.168.1.1'")
    );
    assert!(
        network_config.contains("NETCONFIG_DNS_STATIC_SEARCHLIST='example.com'")
    );
    assert_eq!(read_file(dir.path(), "etc/hostname"), "host1\n");
    assert!(
        read_file(dir.path(), SYSCTL).contains("net.ipv4.ip_forward = 1")
    );
}

#[test]
fn test_merge_files() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "src", "FOO='2'\nBAZ='3'\n");
    write_file(dir.path(), "dst", "# header\nFOO='1'\nBAR=\"x\"\n");

    let source = dir.path().join("src");
    let target = dir.path().join("dst");
    assert!(merge_files(&source, &target).unwrap());
    assert_eq!(
        read_file(dir.path(), "dst"),
        "# header\nFOO='2'\nBAR=\"x\"\nBAZ='3'\n"
    );
    assert!(!merge_files(&source, &target).unwrap());
    assert!(merge_files(&dir.path().join("absent"), &target).is_err());
}

#[test]
fn test_unbound_connection_file_removed() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), IFCFG_ETH0, "BOOTPROTO='dhcp'\n");
    let old = read(dir.path()).config;

    let mut new = old.clone();
    let id = new.connections.by_name("eth0").unwrap().id();
    let mut conn = new.connections.by_id(id).unwrap().clone();
    conn.base_conn_mut().interface = None;
    new.connections.add_or_update(conn);

    let conf = SysnetConfig::new(dir.path());
    let summary = Writer::new(&conf).write(&new, Some(&old)).unwrap();
    assert_eq!(summary.removed, vec![dir.path().join(IFCFG_ETH0)]);
    assert!(summary.written.is_empty());
    assert!(read(dir.path()).config.connections.is_empty());
}

#[test]
fn test_address_notation_and_ifplugd_kept() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        (
            IFCFG_ETH0,
            "BOOTPROTO='static'\nIPADDR='192.168.1.10'\n\
             NETMASK='255.255.255.0'\nSTARTMODE='ifplugd'\n",
        ),
        (
            "etc/sysconfig/network/ifcfg-eth1",
            "BOOTPROTO='static'\nIPADDR='10.0.0.2/8'\n\
             IPADDR_1='10.1.0.2'\nPREFIXLEN_1='16'\n\
             STARTMODE='ifplugd'\nIFPLUGD_PRIORITY='0'\n",
        ),
    ];
    for (path, content) in files {
        write_file(dir.path(), path, content);
    }
    let result = read(dir.path());
    assert!(result.issues.is_empty(), "{}", result.issues);
    assert_eq!(
        result
            .config
            .connections
            .by_name("eth0")
            .unwrap()
            .base_conn()
            .startmode,
        Some(Startmode::Ifplugd { priority: None })
    );

    let out = tempfile::tempdir().unwrap();
    let conf = SysnetConfig::new(out.path());
    Writer::new(&conf).write(&result.config, None).unwrap();
    for (path, content) in files {
        assert_eq!(
            sorted_pairs(&read_file(out.path(), path)),
            sorted_pairs(content)
        );
    }
}

#[test]
fn test_cleared_hostname_removed() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "etc/hostname", "host1\n");
    let old = read(dir.path()).config;
    assert_eq!(old.dns.hostname.as_deref(), Some("host1"));

    let mut new = old.clone();
    new.dns.hostname = None;
    let conf = SysnetConfig::new(dir.path());
    let summary = Writer::new(&conf).write(&new, Some(&old)).unwrap();

    assert!(summary.removed.contains(&dir.path().join("etc/hostname")));
    assert_eq!(read(dir.path()).config.dns.hostname, None);
}
