// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

/// `NETCONFIG_DNS_POLICY` value used when nothing configured.
pub const DEFAULT_RESOLV_CONF_POLICY: &str = "auto";

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case", default)]
#[non_exhaustive]
/// Host name and static DNS settings
pub struct Dns {
    /// Content of `/etc/hostname`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// `NETCONFIG_DNS_STATIC_SERVERS`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    /// `NETCONFIG_DNS_STATIC_SEARCHLIST`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub searchlist: Vec<String>,
    /// `NETCONFIG_DNS_POLICY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolv_conf_policy: Option<String>,
}

impl Dns {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
