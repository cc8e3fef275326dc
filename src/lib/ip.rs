// SPDX-License-Identifier: Apache-2.0

use std::{
    net::{IpAddr, Ipv4Addr},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, JsonDisplay, SysnetError};

const IPV4_ADDR_LEN: u8 = 32;
const IPV6_ADDR_LEN: u8 = 128;

/// IP address with optional prefix length.
///
/// Serialize and deserialize to/from string like `192.0.2.1/24`,
/// `192.0.2.1` or `2001:db8::1/64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub struct IpAddress {
    pub address: IpAddr,
    pub prefix: Option<u8>,
}

impl IpAddress {
    pub fn new(address: IpAddr, prefix: Option<u8>) -> Self {
        Self { address, prefix }
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    fn max_prefix(&self) -> u8 {
        if self.is_ipv4() {
            IPV4_ADDR_LEN
        } else {
            IPV6_ADDR_LEN
        }
    }

    /// Dotted netmask of IPv4 address, None for IPv6 or when prefix is
    /// unknown.
    pub fn netmask(&self) -> Option<Ipv4Addr> {
        match (self.address, self.prefix) {
            (IpAddr::V4(_), Some(prefix)) => Some(prefix_to_netmask(prefix)),
            _ => None,
        }
    }

    /// Return a copy using the prefix length of specified dotted netmask.
    pub fn with_netmask(&self, netmask: &str) -> Result<Self, SysnetError> {
        Ok(Self {
            address: self.address,
            prefix: Some(netmask_to_prefix(netmask)?),
        })
    }

    pub fn with_prefix(&self, prefix: u8) -> Result<Self, SysnetError> {
        let ret = Self {
            address: self.address,
            prefix: Some(prefix),
        };
        ret.validate_prefix()?;
        Ok(ret)
    }

    /// Address without prefix
    pub fn address_str(&self) -> String {
        self.address.to_string()
    }

    fn validate_prefix(&self) -> Result<(), SysnetError> {
        if let Some(prefix) = self.prefix
            && prefix > self.max_prefix()
        {
            return Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid prefix length {prefix} for {}, should be in \
                     range of 0 to {}",
                    self.address,
                    self.max_prefix()
                ),
            ));
        }
        Ok(())
    }
}

impl FromStr for IpAddress {
    type Err = SysnetError;

    fn from_str(value: &str) -> Result<Self, SysnetError> {
        let value = value.trim();
        let (addr_str, prefix_str) = match value.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (value, None),
        };
        let address = IpAddr::from_str(addr_str).map_err(|e| {
            SysnetError::new(
                ErrorKind::InvalidArgument,
                format!("Invalid IP address {value}: {e}"),
            )
        })?;
        let prefix = match prefix_str {
            Some(p) => Some(p.parse::<u8>().map_err(|e| {
                SysnetError::new(
                    ErrorKind::InvalidArgument,
                    format!("Invalid prefix length in {value}: {e}"),
                )
            })?),
            None => None,
        };
        let ret = Self { address, prefix };
        ret.validate_prefix()?;
        Ok(ret)
    }
}

impl std::fmt::Display for IpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{}/{prefix}", self.address)
        } else {
            write!(f, "{}", self.address)
        }
    }
}

impl From<IpAddress> for String {
    fn from(v: IpAddress) -> Self {
        v.to_string()
    }
}

impl TryFrom<String> for IpAddress {
    type Error = SysnetError;

    fn try_from(v: String) -> Result<Self, SysnetError> {
        Self::from_str(v.as_str())
    }
}

pub(crate) fn prefix_to_netmask(prefix: u8) -> Ipv4Addr {
    let prefix = prefix.min(IPV4_ADDR_LEN);
    if prefix == 0 {
        Ipv4Addr::from(0u32)
    } else {
        Ipv4Addr::from(u32::MAX << (IPV4_ADDR_LEN - prefix))
    }
}

pub(crate) fn netmask_to_prefix(netmask: &str) -> Result<u8, SysnetError> {
    let mask = Ipv4Addr::from_str(netmask.trim()).map_err(|e| {
        SysnetError::new(
            ErrorKind::InvalidArgument,
            format!("Invalid netmask {netmask}: {e}"),
        )
    })?;
    let bits = u32::from(mask);
    let prefix = bits.leading_ones();
    if bits.checked_shl(prefix).unwrap_or(0) != 0 {
        return Err(SysnetError::new(
            ErrorKind::InvalidArgument,
            format!("Netmask {netmask} is not contiguous"),
        ));
    }
    Ok(prefix as u8)
}

/// Identify one address of a connection.
///
/// Sysconfig stores addresses in suffixed variables: `IPADDR` is the
/// default one, `IPADDR_1` or `IPADDRfoo` are aliases identified by their
/// suffix.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize,
    Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum AddrSuffix {
    #[default]
    Default,
    Named(String),
}

impl AddrSuffix {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// The string appended to variable names, empty for default.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "",
            Self::Named(s) => s.as_str(),
        }
    }
}

impl From<String> for AddrSuffix {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Default
        } else {
            Self::Named(s)
        }
    }
}

impl From<&str> for AddrSuffix {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<AddrSuffix> for String {
    fn from(v: AddrSuffix) -> Self {
        v.as_str().to_string()
    }
}

impl std::fmt::Display for AddrSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Named(s) => write!(f, "{s}"),
        }
    }
}

/// How the prefix length of an address is stored in configuration files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum PrefixNotation {
    /// Separate `PREFIXLEN` key.
    #[default]
    PrefixLen,
    /// Separate dotted `NETMASK` key, IPv4 only.
    Netmask,
    /// Appended to the address, e.g. `192.0.2.1/24`.
    Cidr,
}

impl PrefixNotation {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// One IP address of a connection with its per-address attributes.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct IpConfig {
    pub address: IpAddress,
    #[serde(default, skip_serializing_if = "AddrSuffix::is_default")]
    pub id: AddrSuffix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<IpAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<IpAddress>,
    #[serde(default, skip_serializing_if = "PrefixNotation::is_default")]
    pub prefix_notation: PrefixNotation,
}

impl IpConfig {
    pub fn new(address: IpAddress) -> Self {
        Self {
            address,
            id: AddrSuffix::Default,
            label: None,
            remote_address: None,
            broadcast: None,
            prefix_notation: PrefixNotation::default(),
        }
    }

    pub fn new_alias(address: IpAddress, id: AddrSuffix) -> Self {
        Self {
            id,
            ..Self::new(address)
        }
    }
}
