// SPDX-License-Identifier: Apache-2.0

//! Profile interface entries carry the same variables as `ifcfg` files, only
//! lower cased and with lists instead of numbered keys. Both directions go
//! through [KeyValueFile] so that connections are built and dumped by the
//! same code as sysconfig.

use super::section::{AliasSection, InterfaceSection};
use crate::sysconfig::{KeyValueFile, KeyValueStyle};

const KEY_IPADDR: &str = "IPADDR";
const KEY_PREFIXLEN: &str = "PREFIXLEN";
const KEY_NETMASK: &str = "NETMASK";
const KEY_LABEL: &str = "LABEL";
const KEY_BONDING_SLAVE: &str = "BONDING_SLAVE";
const KEY_BRIDGE_PORTS: &str = "BRIDGE_PORTS";
const ALIAS_PREFIX: &str = "alias";

fn scalar_fields(
    s: &mut InterfaceSection,
) -> Vec<(&'static str, &mut Option<String>)> {
    vec![
        ("BOOTPROTO", &mut s.bootproto),
        ("STARTMODE", &mut s.startmode),
        ("IFPLUGD_PRIORITY", &mut s.ifplugd_priority),
        ("NAME", &mut s.name),
        ("MTU", &mut s.mtu),
        ("ETHTOOL_OPTIONS", &mut s.ethtool_options),
        ("ZONE", &mut s.zone),
        ("LLADDR", &mut s.lladdr),
        ("DHCLIENT_SET_HOSTNAME", &mut s.dhclient_set_hostname),
        (KEY_IPADDR, &mut s.ipaddr),
        (KEY_PREFIXLEN, &mut s.prefixlen),
        (KEY_NETMASK, &mut s.netmask),
        ("BROADCAST", &mut s.broadcast),
        ("REMOTE_IPADDR", &mut s.remote_ipaddr),
        (KEY_LABEL, &mut s.label),
        ("INTERFACETYPE", &mut s.interfacetype),
        ("BONDING_MASTER", &mut s.bonding_master),
        ("BONDING_MODULE_OPTS", &mut s.bonding_module_opts),
        ("BRIDGE", &mut s.bridge),
        ("BRIDGE_STP", &mut s.bridge_stp),
        ("BRIDGE_FORWARDDELAY", &mut s.bridge_forwarddelay),
        ("ETHERDEVICE", &mut s.etherdevice),
        ("VLAN_ID", &mut s.vlan_id),
        ("TUNNEL", &mut s.tunnel),
        ("TUNNEL_SET_OWNER", &mut s.tunnel_set_owner),
        ("TUNNEL_SET_GROUP", &mut s.tunnel_set_group),
        ("IPOIB_MODE", &mut s.ipoib_mode),
        ("MODEM_DEVICE", &mut s.modem_device),
        ("WIRELESS_MODE", &mut s.wireless_mode),
        ("WIRELESS_ESSID", &mut s.wireless_essid),
        ("WIRELESS_NWID", &mut s.wireless_nwid),
        ("WIRELESS_AUTH_MODE", &mut s.wireless_auth_mode),
        ("WIRELESS_WPA_PSK", &mut s.wireless_wpa_psk),
        ("WIRELESS_KEY_0", &mut s.wireless_key),
        ("WIRELESS_KEY_1", &mut s.wireless_key1),
        ("WIRELESS_KEY_2", &mut s.wireless_key2),
        ("WIRELESS_KEY_3", &mut s.wireless_key3),
        ("WIRELESS_KEY_LENGTH", &mut s.wireless_key_length),
        ("WIRELESS_DEFAULT_KEY", &mut s.wireless_default_key),
        ("WIRELESS_AP", &mut s.wireless_ap),
        ("WIRELESS_CHANNEL", &mut s.wireless_channel),
        ("WIRELESS_AP_SCANMODE", &mut s.wireless_ap_scanmode),
        ("WIRELESS_EAP_MODE", &mut s.wireless_eap_mode),
        ("WIRELESS_EAP_AUTH", &mut s.wireless_eap_auth),
        ("WIRELESS_WPA_IDENTITY", &mut s.wireless_wpa_identity),
        ("WIRELESS_WPA_PASSWORD", &mut s.wireless_wpa_password),
        ("WIRELESS_WPA_ANONID", &mut s.wireless_wpa_anonid),
        ("WIRELESS_CA_CERT", &mut s.wireless_ca_cert),
        ("WIRELESS_CLIENT_CERT", &mut s.wireless_client_cert),
        ("WIRELESS_CLIENT_KEY", &mut s.wireless_client_key),
    ]
}

/// Variables of a profile interface entry in `ifcfg` form.
pub(crate) fn section_to_file(section: &InterfaceSection) -> KeyValueFile {
    let mut file = KeyValueFile::new(KeyValueStyle::Sysconfig);
    let mut section = section.clone();
    for (key, value) in scalar_fields(&mut section) {
        if let Some(v) = value.as_deref().map(str::trim)
            && !v.is_empty()
        {
            file.set(key, v);
        }
    }
    for (i, slave) in section.bonding_slaves.iter().enumerate() {
        file.set(&format!("{KEY_BONDING_SLAVE}{i}"), slave);
    }
    if !section.bridge_ports.is_empty() {
        file.set(KEY_BRIDGE_PORTS, &section.bridge_ports.join(" "));
    }
    for (name, alias) in section.aliases.iter() {
        let suffix = alias_suffix(name);
        for (key, value) in [
            (KEY_IPADDR, &alias.ipaddr),
            (KEY_PREFIXLEN, &alias.prefixlen),
            (KEY_NETMASK, &alias.netmask),
            (KEY_LABEL, &alias.label),
        ] {
            if let Some(v) = value.as_deref() {
                file.set(&format!("{key}{suffix}"), v);
            }
        }
    }
    file
}

/// Profile interface entry from `ifcfg` variables, `device` is left unset.
pub(crate) fn section_from_file(file: &KeyValueFile) -> InterfaceSection {
    let mut section = InterfaceSection::default();
    for (key, value) in scalar_fields(&mut section) {
        *value = file.get(key).map(|v| v.to_string());
    }
    let mut slaves = file.suffixed(KEY_BONDING_SLAVE);
    slaves.sort_by_key(|(suffix, _)| suffix.parse::<u32>().unwrap_or(u32::MAX));
    section.bonding_slaves =
        slaves.into_iter().map(|(_, v)| v.to_string()).collect();
    section.bridge_ports = file
        .get(KEY_BRIDGE_PORTS)
        .map(|v| v.split_whitespace().map(|p| p.to_string()).collect())
        .unwrap_or_default();
    for (suffix, address) in file.suffixed(KEY_IPADDR) {
        if suffix.is_empty() {
            continue;
        }
        let get = |key: &str| {
            file.get(&format!("{key}{suffix}")).map(|v| v.to_string())
        };
        section.aliases.insert(
            alias_name(suffix),
            AliasSection {
                ipaddr: Some(address.to_string()),
                prefixlen: get(KEY_PREFIXLEN),
                netmask: get(KEY_NETMASK),
                label: get(KEY_LABEL),
            },
        );
    }
    section
}

/// `alias0` is stored as `IPADDR_0`, any other name is the suffix itself.
fn alias_suffix(name: &str) -> String {
    match name.strip_prefix(ALIAS_PREFIX) {
        Some(rest) => format!("_{rest}"),
        None => name.to_string(),
    }
}

fn alias_name(suffix: &str) -> String {
    match suffix.strip_prefix('_') {
        Some(rest) => format!("{ALIAS_PREFIX}{rest}"),
        None => suffix.to_string(),
    }
}
