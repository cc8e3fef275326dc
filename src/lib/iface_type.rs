// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, JsonDisplay, SysnetError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[non_exhaustive]
#[serde(rename_all = "kebab-case")]
/// Interface type
pub enum InterfaceType {
    /// Ethernet interface.
    /// Deserialize and serialize from/to 'ethernet'.
    #[default]
    Ethernet,
    /// Wireless interface.
    /// Deserialize and serialize from/to 'wireless'.
    Wireless,
    /// IP over InfiniBand interface
    /// Deserialize and serialize from/to 'infiniband'.
    Infiniband,
    /// Bond interface.
    /// Deserialize and serialize from/to 'bonding'.
    Bonding,
    /// Bridge provided by Linux kernel.
    /// Deserialize and serialize from/to 'bridge'.
    Bridge,
    /// VLAN interface.
    /// Deserialize and serialize from/to 'vlan'.
    Vlan,
    /// TUN interface.
    Tun,
    /// TAP interface.
    Tap,
    /// Dummy interface.
    Dummy,
    /// Loopback interface.
    Loopback,
    /// S/390 QDIO Ethernet (OSA-Express, HiperSockets) group device.
    Qeth,
    /// S/390 channel-to-channel group device.
    Ctc,
    /// S/390 LAN channel station group device.
    Lcs,
    /// Point-to-point over modem. Detected but not managed.
    Ppp,
}

impl InterfaceType {
    pub const ALL: [Self; 14] = [
        Self::Ethernet,
        Self::Wireless,
        Self::Infiniband,
        Self::Bonding,
        Self::Bridge,
        Self::Vlan,
        Self::Tun,
        Self::Tap,
        Self::Dummy,
        Self::Loopback,
        Self::Qeth,
        Self::Ctc,
        Self::Lcs,
        Self::Ppp,
    ];

    /// Short name used by sysconfig `INTERFACETYPE` and as kernel name
    /// prefix.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Ethernet => "eth",
            Self::Wireless => "wlan",
            Self::Infiniband => "ib",
            Self::Bonding => "bond",
            Self::Bridge => "br",
            Self::Vlan => "vlan",
            Self::Tun => "tun",
            Self::Tap => "tap",
            Self::Dummy => "dummy",
            Self::Loopback => "lo",
            Self::Qeth => "qeth",
            Self::Ctc => "ctc",
            Self::Lcs => "lcs",
            Self::Ppp => "ppp",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().find(|t| t.short_name() == name).copied()
    }

    /// Whether interface of this type is created by kernel or userspace on
    /// demand instead of backed by hardware.
    pub fn is_virtual(&self) -> bool {
        matches!(
            self,
            Self::Bonding
                | Self::Bridge
                | Self::Vlan
                | Self::Tun
                | Self::Tap
                | Self::Dummy
        )
    }

    /// Whether this is a channel attached S/390 group device.
    pub fn is_s390(&self) -> bool {
        matches!(self, Self::Qeth | Self::Ctc | Self::Lcs)
    }
}

impl FromStr for InterfaceType {
    type Err = SysnetError;

    /// Accept both the full name (e.g. `bonding`) and short name
    /// (e.g. `bond`).
    fn from_str(s: &str) -> Result<Self, SysnetError> {
        if let Some(t) = Self::from_short_name(s) {
            return Ok(t);
        }
        let value = serde_json::Value::String(s.trim().to_lowercase());
        serde_json::from_value(value).map_err(|_| {
            SysnetError::new(
                ErrorKind::InvalidArgument,
                format!("Unknown interface type {s}"),
            )
        })
    }
}
