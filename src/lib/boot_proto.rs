// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, SysnetError};

/// How an interface obtains its IP address.
///
/// Serialize and deserialize to/from the sysconfig `BOOTPROTO` value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub enum BootProtocol {
    #[default]
    Static,
    Dhcp,
    Dhcp4,
    Dhcp6,
    /// DHCP with IPv4 link-local fallback, `dhcp+autoip`.
    DhcpAutoip,
    Autoip,
    None,
    /// Address configured by iSCSI boot firmware table.
    Ibft,
}

impl BootProtocol {
    pub const ALL: [Self; 8] = [
        Self::Static,
        Self::Dhcp,
        Self::Dhcp4,
        Self::Dhcp6,
        Self::DhcpAutoip,
        Self::Autoip,
        Self::None,
        Self::Ibft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dhcp => "dhcp",
            Self::Dhcp4 => "dhcp4",
            Self::Dhcp6 => "dhcp6",
            Self::DhcpAutoip => "dhcp+autoip",
            Self::Autoip => "autoip",
            Self::None => "none",
            Self::Ibft => "ibft",
        }
    }

    pub fn is_dhcp(&self) -> bool {
        matches!(
            self,
            Self::Dhcp | Self::Dhcp4 | Self::Dhcp6 | Self::DhcpAutoip
        )
    }

    pub fn is_static(&self) -> bool {
        self == &Self::Static
    }
}

impl std::fmt::Display for BootProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BootProtocol {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|b| b.as_str() == s)
            .copied()
            .ok_or_else(|| {
                SysnetError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "Invalid boot protocol {s}, valid values are: {}",
                        Self::ALL
                            .iter()
                            .map(|b| b.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

impl From<BootProtocol> for String {
    fn from(v: BootProtocol) -> Self {
        v.as_str().to_string()
    }
}

impl TryFrom<String> for BootProtocol {
    type Error = SysnetError;

    fn try_from(v: String) -> Result<Self, SysnetError> {
        Self::from_str(v.as_str())
    }
}
