// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::InterfaceType;

const LOOPBACK_IFACE_NAME: &str = "lo";

/// Flags whose value alone decides the type.
const EXPLICIT_FLAGS: [(&str, &str, InterfaceType); 4] = [
    ("BONDING_MASTER", "yes", InterfaceType::Bonding),
    ("BRIDGE", "yes", InterfaceType::Bridge),
    ("TUNNEL", "tun", InterfaceType::Tun),
    ("TUNNEL", "tap", InterfaceType::Tap),
];

/// Keys only used by one type of connection.
const TYPE_SPECIFIC_KEYS: [(&str, InterfaceType); 4] = [
    ("ETHERDEVICE", InterfaceType::Vlan),
    ("WIRELESS_MODE", InterfaceType::Wireless),
    ("MODEM_DEVICE", InterfaceType::Ppp),
    ("IPOIB_MODE", InterfaceType::Infiniband),
];

/// Explicit flags which are neither `yes` nor `no` make the type unknown.
const YES_NO_FLAGS: [&str; 2] = ["BONDING_MASTER", "BRIDGE"];

const INTERFACETYPE_KEY: &str = "INTERFACETYPE";
const TUNNEL_KEY: &str = "TUNNEL";

/// Key lookup over a configuration source, implemented once per format.
///
/// Keys are sysconfig variable names (e.g. `BONDING_MASTER`), adapters of
/// other formats translate them.
pub trait TypeSource {
    fn iface_name(&self) -> &str;

    /// Value of key, None when undefined or empty.
    fn value(&self, key: &str) -> Option<String>;

    /// Type reported by hardware probing, if any.
    fn hardware_type(&self) -> Option<InterfaceType> {
        None
    }
}

/// Detect interface type, None means unknown.
///
/// Explicit configuration outranks key existence which outranks the
/// `INTERFACETYPE` override, the `lo` name, hardware and finally the
/// ethernet fallback.
pub fn detect_type(source: &dyn TypeSource) -> Option<InterfaceType> {
    for (key, expected, iface_type) in EXPLICIT_FLAGS {
        if let Some(value) = source.value(key)
            && value.trim().eq_ignore_ascii_case(expected)
        {
            return Some(iface_type);
        }
    }
    for key in YES_NO_FLAGS {
        if let Some(value) = source.value(key)
            && !value.trim().eq_ignore_ascii_case("no")
        {
            log::warn!(
                "Interface {} has invalid {key}={value}, expecting yes or no",
                source.iface_name()
            );
            return None;
        }
    }
    if let Some(tunnel) = source.value(TUNNEL_KEY) {
        log::warn!(
            "Interface {} has unsupported TUNNEL={tunnel}",
            source.iface_name()
        );
        return None;
    }

    for (key, iface_type) in TYPE_SPECIFIC_KEYS {
        if source.value(key).is_some() {
            return Some(iface_type);
        }
    }

    if let Some(value) = source.value(INTERFACETYPE_KEY) {
        return match InterfaceType::from_str(&value) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!(
                    "Interface {} has invalid {INTERFACETYPE_KEY}: {e}",
                    source.iface_name()
                );
                None
            }
        };
    }

    if source.iface_name() == LOOPBACK_IFACE_NAME {
        return Some(InterfaceType::Loopback);
    }

    Some(source.hardware_type().unwrap_or(InterfaceType::Ethernet))
}
