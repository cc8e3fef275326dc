// SPDX-License-Identifier: Apache-2.0

//! Mapping between connection attributes and `ifcfg-*` variables.

use std::{fmt::Display, str::FromStr};

use super::file::{KeyValueFile, parse_bool};
use crate::{
    AddrSuffix, BaseConnection, BootProtocol, ConnectionConfig, Hardware,
    InfinibandMode, InterfaceType, IpAddress, IpConfig, Issues,
    PrefixNotation, Startmode, TypeSource, WirelessAuthMode,
    conns::MAX_WEP_KEYS, detect_type,
};

const KEY_BOOTPROTO: &str = "BOOTPROTO";
const KEY_STARTMODE: &str = "STARTMODE";
const KEY_IFPLUGD_PRIORITY: &str = "IFPLUGD_PRIORITY";
const KEY_NAME: &str = "NAME";
const KEY_MTU: &str = "MTU";
const KEY_ETHTOOL_OPTIONS: &str = "ETHTOOL_OPTIONS";
const KEY_ZONE: &str = "ZONE";
const KEY_LLADDR: &str = "LLADDR";
const KEY_DHCLIENT_SET_HOSTNAME: &str = "DHCLIENT_SET_HOSTNAME";
const KEY_IPADDR: &str = "IPADDR";
const KEY_PREFIXLEN: &str = "PREFIXLEN";
const KEY_NETMASK: &str = "NETMASK";
const KEY_LABEL: &str = "LABEL";
const KEY_REMOTE_IPADDR: &str = "REMOTE_IPADDR";
const KEY_BROADCAST: &str = "BROADCAST";
const KEY_INTERFACETYPE: &str = "INTERFACETYPE";

const KEY_BONDING_MASTER: &str = "BONDING_MASTER";
const KEY_BONDING_SLAVE: &str = "BONDING_SLAVE";
const KEY_BONDING_MODULE_OPTS: &str = "BONDING_MODULE_OPTS";
const KEY_BRIDGE: &str = "BRIDGE";
const KEY_BRIDGE_PORTS: &str = "BRIDGE_PORTS";
const KEY_BRIDGE_STP: &str = "BRIDGE_STP";
const KEY_BRIDGE_FORWARDDELAY: &str = "BRIDGE_FORWARDDELAY";
const KEY_ETHERDEVICE: &str = "ETHERDEVICE";
const KEY_VLAN_ID: &str = "VLAN_ID";
const KEY_TUNNEL: &str = "TUNNEL";
const KEY_TUNNEL_SET_OWNER: &str = "TUNNEL_SET_OWNER";
const KEY_TUNNEL_SET_GROUP: &str = "TUNNEL_SET_GROUP";
const KEY_IPOIB_MODE: &str = "IPOIB_MODE";

const KEY_WIRELESS_MODE: &str = "WIRELESS_MODE";
const KEY_WIRELESS_ESSID: &str = "WIRELESS_ESSID";
const KEY_WIRELESS_NWID: &str = "WIRELESS_NWID";
const KEY_WIRELESS_AUTH_MODE: &str = "WIRELESS_AUTH_MODE";
const KEY_WIRELESS_WPA_PSK: &str = "WIRELESS_WPA_PSK";
const KEY_WIRELESS_KEY: &str = "WIRELESS_KEY";
const KEY_WIRELESS_KEY_LENGTH: &str = "WIRELESS_KEY_LENGTH";
const KEY_WIRELESS_DEFAULT_KEY: &str = "WIRELESS_DEFAULT_KEY";
const KEY_WIRELESS_AP: &str = "WIRELESS_AP";
const KEY_WIRELESS_CHANNEL: &str = "WIRELESS_CHANNEL";
const KEY_WIRELESS_AP_SCANMODE: &str = "WIRELESS_AP_SCANMODE";
const KEY_WIRELESS_EAP_MODE: &str = "WIRELESS_EAP_MODE";
const KEY_WIRELESS_EAP_AUTH: &str = "WIRELESS_EAP_AUTH";
const KEY_WIRELESS_WPA_IDENTITY: &str = "WIRELESS_WPA_IDENTITY";
const KEY_WIRELESS_WPA_PASSWORD: &str = "WIRELESS_WPA_PASSWORD";
const KEY_WIRELESS_WPA_ANONID: &str = "WIRELESS_WPA_ANONID";
const KEY_WIRELESS_CA_CERT: &str = "WIRELESS_CA_CERT";
const KEY_WIRELESS_CLIENT_CERT: &str = "WIRELESS_CLIENT_CERT";
const KEY_WIRELESS_CLIENT_KEY: &str = "WIRELESS_CLIENT_KEY";

/// [TypeSource] over an `ifcfg-<name>` file.
pub(crate) struct IfcfgTypeSource<'a> {
    pub(crate) name: &'a str,
    pub(crate) file: &'a KeyValueFile,
    pub(crate) hardware_type: Option<InterfaceType>,
}

impl TypeSource for IfcfgTypeSource<'_> {
    fn iface_name(&self) -> &str {
        self.name
    }

    fn value(&self, key: &str) -> Option<String> {
        self.file.get(key).map(|v| v.to_string())
    }

    fn hardware_type(&self) -> Option<InterfaceType> {
        self.hardware_type
    }
}

/// Reads variables and records invalid values as issues of one file.
struct Loader<'a> {
    file: &'a KeyValueFile,
    location: &'a str,
    issues: &'a mut Issues,
}

impl Loader<'_> {
    fn string(&self, key: &str) -> Option<String> {
        self.file.get(key).map(|v| v.to_string())
    }

    fn parse<T>(&mut self, key: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let file = self.file;
        let value = file.get(key)?;
        match T::from_str(value.trim()) {
            Ok(v) => Some(v),
            Err(e) => {
                self.issues
                    .add(self.location, format!("Invalid {key}={value}: {e}"));
                None
            }
        }
    }

    fn bool(&mut self, key: &str) -> Option<bool> {
        let file = self.file;
        let value = file.get(key)?;
        let ret = parse_bool(value);
        if ret.is_none() {
            self.issues.add(
                self.location,
                format!("Invalid {key}={value}: expecting yes or no"),
            );
        }
        ret
    }
}

/// Populate connection from `ifcfg` variables, invalid values are reported
/// into `issues` and left as default.
pub(crate) fn load_conn(
    file: &KeyValueFile,
    conn: &mut ConnectionConfig,
    hardware: Option<&Hardware>,
    location: &str,
    issues: &mut Issues,
) {
    let mut loader = Loader {
        file,
        location,
        issues,
    };
    load_base(&mut loader, conn.base_conn_mut());

    match conn {
        ConnectionConfig::Bonding(c) => {
            let mut slaves = file.suffixed(KEY_BONDING_SLAVE);
            slaves.sort_by_key(|(suffix, _)| {
                (suffix.parse::<u32>().unwrap_or(u32::MAX), suffix.to_string())
            });
            c.slaves = slaves.into_iter().map(|(_, v)| v.to_string()).collect();
            c.options = loader.string(KEY_BONDING_MODULE_OPTS);
        }
        ConnectionConfig::Bridge(c) => {
            c.ports = file
                .get(KEY_BRIDGE_PORTS)
                .map(|v| v.split_whitespace().map(|p| p.to_string()).collect())
                .unwrap_or_default();
            c.stp = loader.bool(KEY_BRIDGE_STP).unwrap_or_default();
            c.forward_delay = loader.parse(KEY_BRIDGE_FORWARDDELAY);
        }
        ConnectionConfig::Vlan(c) => {
            c.parent_device = loader.string(KEY_ETHERDEVICE);
            c.vlan_id = loader.parse(KEY_VLAN_ID);
        }
        ConnectionConfig::Wireless(c) => {
            c.mode = loader.string(KEY_WIRELESS_MODE);
            c.essid = loader.string(KEY_WIRELESS_ESSID);
            c.nwid = loader.string(KEY_WIRELESS_NWID);
            c.auth_mode =
                loader.parse::<WirelessAuthMode>(KEY_WIRELESS_AUTH_MODE);
            c.wpa_psk = loader.string(KEY_WIRELESS_WPA_PSK);
            let mut keys: Vec<String> = (0..MAX_WEP_KEYS)
                .map(|i| {
                    let key = file.get(&format!("{KEY_WIRELESS_KEY}_{i}"));
                    // Plain `WIRELESS_KEY` is the legacy name of key 0
                    let key = if i == 0 {
                        key.or(file.get(KEY_WIRELESS_KEY))
                    } else {
                        key
                    };
                    key.unwrap_or_default().to_string()
                })
                .collect();
            while keys.last().map(|k| k.is_empty()) == Some(true) {
                keys.pop();
            }
            c.keys = keys;
            c.key_length = loader.parse(KEY_WIRELESS_KEY_LENGTH);
            c.default_key = loader.parse(KEY_WIRELESS_DEFAULT_KEY);
            c.ap = loader.string(KEY_WIRELESS_AP);
            c.channel = loader.parse(KEY_WIRELESS_CHANNEL);
            c.ap_scanmode = loader.parse(KEY_WIRELESS_AP_SCANMODE);
            c.eap_mode = loader.string(KEY_WIRELESS_EAP_MODE);
            c.eap_auth = loader.string(KEY_WIRELESS_EAP_AUTH);
            c.wpa_identity = loader.string(KEY_WIRELESS_WPA_IDENTITY);
            c.wpa_password = loader.string(KEY_WIRELESS_WPA_PASSWORD);
            c.wpa_anonymous_identity = loader.string(KEY_WIRELESS_WPA_ANONID);
            c.ca_cert = loader.string(KEY_WIRELESS_CA_CERT);
            c.client_cert = loader.string(KEY_WIRELESS_CLIENT_CERT);
            c.client_key = loader.string(KEY_WIRELESS_CLIENT_KEY);
        }
        ConnectionConfig::TunTap(c) => {
            c.owner = loader.string(KEY_TUNNEL_SET_OWNER);
            c.group = loader.string(KEY_TUNNEL_SET_GROUP);
        }
        ConnectionConfig::Infiniband(c) => {
            c.ipoib_mode = loader.parse::<InfinibandMode>(KEY_IPOIB_MODE);
        }
        // S/390 channels belong to the device activation, not to ifcfg.
        ConnectionConfig::Qeth(c) => {
            if let Some(channels) = hardware.and_then(|h| h.channels.as_ref())
            {
                c.channels = channels.clone();
            }
        }
        ConnectionConfig::Ctc(c) => {
            if let Some(channels) = hardware.and_then(|h| h.channels.as_ref())
            {
                c.channels = channels.clone();
            }
        }
        ConnectionConfig::Lcs(c) => {
            if let Some(channels) = hardware.and_then(|h| h.channels.as_ref())
            {
                c.channels = channels.clone();
            }
        }
        ConnectionConfig::Ethernet(_)
        | ConnectionConfig::Dummy(_)
        | ConnectionConfig::Loopback(_) => (),
    }
}

fn load_base(loader: &mut Loader, base: &mut BaseConnection) {
    if let Some(bootproto) = loader.parse::<BootProtocol>(KEY_BOOTPROTO) {
        base.bootproto = bootproto;
    }
    if let Some(name) = loader.string(KEY_STARTMODE) {
        let priority = loader.parse::<u32>(KEY_IFPLUGD_PRIORITY);
        match Startmode::from_name(&name, priority) {
            Ok(s) => base.startmode = Some(s),
            Err(e) => loader.issues.add(loader.location, e.msg().to_string()),
        }
    }
    base.description = loader.string(KEY_NAME);
    base.mtu = loader.parse(KEY_MTU);
    base.ethtool_options = loader.string(KEY_ETHTOOL_OPTIONS);
    base.firewall_zone = loader.string(KEY_ZONE);
    base.lladdress = loader.string(KEY_LLADDR);
    base.dhclient_set_hostname = loader.bool(KEY_DHCLIENT_SET_HOSTNAME);
    load_ips(loader, base);
}

fn load_ips(loader: &mut Loader, base: &mut BaseConnection) {
    let file = loader.file;
    for (suffix, value) in file.suffixed(KEY_IPADDR) {
        let mut address = match IpAddress::from_str(value) {
            Ok(a) => a,
            Err(e) => {
                loader.issues.add(
                    loader.location,
                    format!(
                        "Invalid {KEY_IPADDR}{suffix}={value}: {}",
                        e.msg()
                    ),
                );
                continue;
            }
        };
        let mut prefix_notation = PrefixNotation::Cidr;
        if address.prefix.is_none() {
            prefix_notation = PrefixNotation::PrefixLen;
            if let Some(prefix) =
                loader.parse::<u8>(&format!("{KEY_PREFIXLEN}{suffix}"))
            {
                match address.with_prefix(prefix) {
                    Ok(a) => address = a,
                    Err(e) => loader
                        .issues
                        .add(loader.location, e.msg().to_string()),
                }
            } else if let Some(netmask) =
                file.get(&format!("{KEY_NETMASK}{suffix}"))
            {
                prefix_notation = PrefixNotation::Netmask;
                match address.with_netmask(netmask) {
                    Ok(a) => address = a,
                    Err(e) => loader
                        .issues
                        .add(loader.location, e.msg().to_string()),
                }
            }
        }
        let mut ip = IpConfig::new_alias(address, AddrSuffix::from(suffix));
        ip.prefix_notation = prefix_notation;
        ip.label = loader.string(&format!("{KEY_LABEL}{suffix}"));
        ip.remote_address =
            loader.parse(&format!("{KEY_REMOTE_IPADDR}{suffix}"));
        ip.broadcast = loader.parse(&format!("{KEY_BROADCAST}{suffix}"));
        if ip.id.is_default() {
            base.ip = Some(ip);
        } else {
            base.ip_aliases.push(ip);
        }
    }
}

/// Store connection into `file` after cleaning it.
///
/// `INTERFACETYPE` is added whenever the type could not be detected back
/// from the other variables.
pub(crate) fn dump_conn(
    conn: &ConnectionConfig,
    hardware_type: Option<InterfaceType>,
    file: &mut KeyValueFile,
) {
    file.clean();
    dump_base(conn.base_conn(), file);

    match conn {
        ConnectionConfig::Bonding(c) => {
            file.set(KEY_BONDING_MASTER, "yes");
            for (i, slave) in c.slaves.iter().enumerate() {
                file.set(&format!("{KEY_BONDING_SLAVE}{i}"), slave);
            }
            file.set_opt(KEY_BONDING_MODULE_OPTS, c.options.as_deref());
        }
        ConnectionConfig::Bridge(c) => {
            file.set(KEY_BRIDGE, "yes");
            file.set(KEY_BRIDGE_PORTS, &c.ports.join(" "));
            file.set(KEY_BRIDGE_STP, if c.stp { "on" } else { "off" });
            file.set_opt(
                KEY_BRIDGE_FORWARDDELAY,
                c.forward_delay.map(|d| d.to_string()).as_deref(),
            );
        }
        ConnectionConfig::Vlan(c) => {
            file.set_opt(KEY_ETHERDEVICE, c.parent_device.as_deref());
            file.set_opt(
                KEY_VLAN_ID,
                c.vlan_id.map(|i| i.to_string()).as_deref(),
            );
        }
        ConnectionConfig::Wireless(c) => {
            file.set_opt(KEY_WIRELESS_MODE, c.mode.as_deref());
            file.set_opt(KEY_WIRELESS_ESSID, c.essid.as_deref());
            file.set_opt(KEY_WIRELESS_NWID, c.nwid.as_deref());
            file.set_opt(
                KEY_WIRELESS_AUTH_MODE,
                c.auth_mode.map(|m| m.as_str()),
            );
            file.set_opt(KEY_WIRELESS_WPA_PSK, c.wpa_psk.as_deref());
            for (i, key) in c
                .keys
                .iter()
                .enumerate()
                .take(MAX_WEP_KEYS)
                .filter(|(_, k)| !k.is_empty())
            {
                file.set(&format!("{KEY_WIRELESS_KEY}_{i}"), key);
            }
            file.set_opt(
                KEY_WIRELESS_KEY_LENGTH,
                c.key_length.map(|l| l.to_string()).as_deref(),
            );
            file.set_opt(
                KEY_WIRELESS_DEFAULT_KEY,
                c.default_key.map(|k| k.to_string()).as_deref(),
            );
            file.set_opt(KEY_WIRELESS_AP, c.ap.as_deref());
            file.set_opt(
                KEY_WIRELESS_CHANNEL,
                c.channel.map(|ch| ch.to_string()).as_deref(),
            );
            file.set_opt(
                KEY_WIRELESS_AP_SCANMODE,
                c.ap_scanmode.map(|m| m.to_string()).as_deref(),
            );
            file.set_opt(KEY_WIRELESS_EAP_MODE, c.eap_mode.as_deref());
            file.set_opt(KEY_WIRELESS_EAP_AUTH, c.eap_auth.as_deref());
            file.set_opt(KEY_WIRELESS_WPA_IDENTITY, c.wpa_identity.as_deref());
            file.set_opt(KEY_WIRELESS_WPA_PASSWORD, c.wpa_password.as_deref());
            file.set_opt(
                KEY_WIRELESS_WPA_ANONID,
                c.wpa_anonymous_identity.as_deref(),
            );
            file.set_opt(KEY_WIRELESS_CA_CERT, c.ca_cert.as_deref());
            file.set_opt(KEY_WIRELESS_CLIENT_CERT, c.client_cert.as_deref());
            file.set_opt(KEY_WIRELESS_CLIENT_KEY, c.client_key.as_deref());
        }
        ConnectionConfig::TunTap(c) => {
            file.set(KEY_TUNNEL, c.mode.as_str());
            file.set_opt(KEY_TUNNEL_SET_OWNER, c.owner.as_deref());
            file.set_opt(KEY_TUNNEL_SET_GROUP, c.group.as_deref());
        }
        ConnectionConfig::Infiniband(c) => {
            file.set_opt(KEY_IPOIB_MODE, c.ipoib_mode.map(|m| m.as_str()));
        }
        ConnectionConfig::Ethernet(_)
        | ConnectionConfig::Dummy(_)
        | ConnectionConfig::Loopback(_)
        | ConnectionConfig::Qeth(_)
        | ConnectionConfig::Ctc(_)
        | ConnectionConfig::Lcs(_) => (),
    }

    let iface_type = conn.iface_type();
    let detected = detect_type(&IfcfgTypeSource {
        name: conn.name(),
        file,
        hardware_type,
    });
    if detected != Some(iface_type) {
        file.set(KEY_INTERFACETYPE, iface_type.short_name());
    }
}

fn dump_base(base: &BaseConnection, file: &mut KeyValueFile) {
    file.set(KEY_BOOTPROTO, base.bootproto.as_str());
    if let Some(startmode) = base.startmode {
        file.set(KEY_STARTMODE, startmode.name());
        if let Startmode::Ifplugd {
            priority: Some(priority),
        } = startmode
        {
            file.set(KEY_IFPLUGD_PRIORITY, &priority.to_string());
        }
    }
    file.set_opt(KEY_NAME, base.description.as_deref());
    file.set_opt(KEY_MTU, base.mtu.map(|m| m.to_string()).as_deref());
    file.set_opt(KEY_ETHTOOL_OPTIONS, base.ethtool_options.as_deref());
    file.set_opt(KEY_ZONE, base.firewall_zone.as_deref());
    file.set_opt(KEY_LLADDR, base.lladdress.as_deref());
    if let Some(v) = base.dhclient_set_hostname {
        file.set_bool(KEY_DHCLIENT_SET_HOSTNAME, v);
    }
    for ip in base.all_ips() {
        let suffix = ip.id.as_str();
        dump_address(ip, suffix, file);
        file.set_opt(&format!("{KEY_LABEL}{suffix}"), ip.label.as_deref());
        file.set_opt(
            &format!("{KEY_REMOTE_IPADDR}{suffix}"),
            ip.remote_address.map(|a| a.to_string()).as_deref(),
        );
        file.set_opt(
            &format!("{KEY_BROADCAST}{suffix}"),
            ip.broadcast.map(|a| a.to_string()).as_deref(),
        );
    }
}

/// Address keys in the notation the prefix was read with. A netmask is
/// only possible for IPv4, IPv6 falls back to `PREFIXLEN`.
fn dump_address(ip: &IpConfig, suffix: &str, file: &mut KeyValueFile) {
    let address = &ip.address;
    let Some(prefix) = address.prefix else {
        file.set(&format!("{KEY_IPADDR}{suffix}"), &address.address_str());
        return;
    };
    match (ip.prefix_notation, address.netmask()) {
        (PrefixNotation::Cidr, _) => {
            file.set(&format!("{KEY_IPADDR}{suffix}"), &address.to_string());
        }
        (PrefixNotation::Netmask, Some(netmask)) => {
            file.set(&format!("{KEY_IPADDR}{suffix}"), &address.address_str());
            file.set(&format!("{KEY_NETMASK}{suffix}"), &netmask.to_string());
        }
        _ => {
            file.set(&format!("{KEY_IPADDR}{suffix}"), &address.address_str());
            file.set(&format!("{KEY_PREFIXLEN}{suffix}"), &prefix.to_string());
        }
    }
}
