// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::deserializer::{option_scalar, scalar_list};
use crate::{
    ErrorKind, InterfaceType, JsonDisplayHideSecrets, SysnetError, TypeSource,
    conns::HIDE_PASSWORD_STR, sysconfig::parse_bool,
};

const BONDING_SLAVE_PREFIX: &str = "bonding_slave";
const BONDING_SLAVES_KEY: &str = "bonding_slaves";
const INTERFACES_KEY: &str = "interfaces";

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonDisplayHideSecrets,
)]
#[non_exhaustive]
/// The `networking` section of an automated installation profile
///
/// Keys are case insensitive. Every entry is optional, an absent entry
/// means the default value.
pub struct NetworkingSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsSection>,
    #[serde(
        rename = "net-udev",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub net_udev: Vec<UdevRuleSection>,
    #[serde(
        rename = "s390-devices",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub s390_devices: Vec<S390DeviceSection>,
}

impl NetworkingSection {
    /// Deserialize from a YAML or JSON tree after lower casing every key and
    /// folding `bonding_slaveN` keys into the `bonding_slaves` list.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SysnetError> {
        let mut value = lowercase_keys(value);
        if let Some(serde_json::Value::Array(ifaces)) =
            value.get_mut(INTERFACES_KEY)
        {
            for iface in ifaces.iter_mut() {
                if let serde_json::Value::Object(map) = iface {
                    fold_bonding_slaves(map);
                }
            }
        }
        serde_json::from_value(value).map_err(|e| {
            SysnetError::new(
                ErrorKind::InvalidArgument,
                format!("Invalid networking section: {e}"),
            )
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SysnetError> {
        let value: serde_json::Value = serde_yaml::from_str(content)?;
        Self::from_value(value)
    }

    pub fn hide_secrets(&mut self) {
        for iface in self.interfaces.iter_mut() {
            iface.hide_secrets();
        }
    }
}

fn lowercase_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        serde_json::Value::Array(items) => serde_json::Value::Array(
            items.into_iter().map(lowercase_keys).collect(),
        ),
        v => v,
    }
}

fn fold_bonding_slaves(map: &mut serde_json::Map<String, serde_json::Value>) {
    let mut slaves: Vec<(u32, serde_json::Value)> = Vec::new();
    let keys: Vec<String> = map
        .keys()
        .filter(|k| {
            k.strip_prefix(BONDING_SLAVE_PREFIX)
                .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or_default()
        })
        .cloned()
        .collect();
    for key in keys {
        let index = key[BONDING_SLAVE_PREFIX.len()..]
            .parse::<u32>()
            .unwrap_or(u32::MAX);
        if let Some(v) = map.remove(&key) {
            slaves.push((index, v));
        }
    }
    if slaves.is_empty() {
        return;
    }
    slaves.sort_by_key(|(i, _)| *i);
    let entry = map
        .entry(BONDING_SLAVES_KEY.to_string())
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    if let serde_json::Value::Array(list) = entry {
        list.extend(slaves.into_iter().map(|(_, v)| v));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
/// One connection of the profile, attribute names follow sysconfig
/// variables in lower case
pub struct InterfaceSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bootproto: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub startmode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ifplugd_priority: Option<String>,
    /// Human readable description.
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub mtu: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ethtool_options: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub lladdr: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub dhclient_set_hostname: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipaddr: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefixlen: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub netmask: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub broadcast: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_ipaddr: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    /// Additional addresses keyed by `alias<N>`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, AliasSection>,
    #[serde(
        default,
        deserialize_with = "scalar_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hostnames: Vec<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub interfacetype: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonding_master: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bonding_slaves: Vec<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonding_module_opts: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bridge_ports: Vec<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge_stp: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge_forwarddelay: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub etherdevice: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub vlan_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub tunnel: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub tunnel_set_owner: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub tunnel_set_group: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipoib_mode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub modem_device: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_mode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_essid: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_nwid: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_auth_mode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_wpa_psk: Option<String>,
    /// WEP keys by index, `wireless_key` is accepted as key 0.
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_key1: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_key2: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_key3: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_key_length: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_default_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_ap: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_channel: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_ap_scanmode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_eap_mode: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_eap_auth: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_wpa_identity: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_wpa_password: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_wpa_anonid: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_ca_cert: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_client_cert: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub wireless_client_key: Option<String>,
}

impl InterfaceSection {
    pub fn hide_secrets(&mut self) {
        for secret in [
            self.wireless_wpa_psk.as_mut(),
            self.wireless_wpa_password.as_mut(),
            self.wireless_key.as_mut(),
            self.wireless_key1.as_mut(),
            self.wireless_key2.as_mut(),
            self.wireless_key3.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            secret.replace_range(.., HIDE_PASSWORD_STR);
        }
    }
}

/// Profile interfaces are detected with the same rules as `ifcfg` files.
/// Boolean flags may be written as `true` in profile, they are presented as
/// `yes` here.
impl TypeSource for InterfaceSection {
    fn iface_name(&self) -> &str {
        self.device.as_deref().unwrap_or_default()
    }

    fn value(&self, key: &str) -> Option<String> {
        let flag = |v: &Option<String>| -> Option<String> {
            let v = v.as_deref()?;
            Some(match parse_bool(v) {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => v.to_string(),
            })
        };
        let value = match key {
            "BONDING_MASTER" => flag(&self.bonding_master),
            "BRIDGE" => flag(&self.bridge),
            "TUNNEL" => self.tunnel.clone(),
            "ETHERDEVICE" => self.etherdevice.clone(),
            "WIRELESS_MODE" => self.wireless_mode.clone(),
            "MODEM_DEVICE" => self.modem_device.clone(),
            "IPOIB_MODE" => self.ipoib_mode.clone(),
            "INTERFACETYPE" => self.interfacetype.clone(),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AliasSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipaddr: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefixlen: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub netmask: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RoutingSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv4_forward: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv6_forward: Option<String>,
    /// Legacy name of `ipv4_forward`.
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_forward: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
/// Route in the same columns as sysconfig `routes` file, `-` means unset
pub struct RouteSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub gateway: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub netmask: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub extrapara: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DnsSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub hostname: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nameservers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "scalar_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub searchlist: Vec<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolv_conf_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
/// Udev rule pinning a device name, `rule` is `ATTR{address}` or
/// `KERNELS`
pub struct UdevRuleSection {
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub rule: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct S390DeviceSection {
    /// `qeth`, `ctc` or `lcs`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_type: Option<String>,
    /// Colon separated read, write and optional data channel.
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub chanids: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub layer2: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub portno: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<String>,
}

impl S390DeviceSection {
    pub fn iface_type(&self) -> Option<InterfaceType> {
        self.device_type
            .as_deref()
            .and_then(InterfaceType::from_short_name)
            .filter(|t| t.is_s390())
    }
}
