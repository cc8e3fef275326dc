// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, ErrorKind, InterfaceType, JsonDisplayHideSecrets,
    SysnetConnection, SysnetError,
};

pub(crate) const HIDE_PASSWORD_STR: &str = "<_password_hid_by_sysnet_>";
const DEFAULT_WIRELESS_MODE: &str = "managed";
pub(crate) const MAX_WEP_KEYS: usize = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub enum WirelessAuthMode {
    /// No encryption at all.
    NoEncryption,
    /// WEP open system.
    #[default]
    Open,
    /// WEP shared key.
    SharedKey,
    /// WPA pre-shared key.
    Psk,
    /// WPA enterprise.
    Eap,
}

impl WirelessAuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEncryption => "no-encryption",
            Self::Open => "open",
            Self::SharedKey => "sharedkey",
            Self::Psk => "psk",
            Self::Eap => "eap",
        }
    }
}

impl std::fmt::Display for WirelessAuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WirelessAuthMode {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        match s.trim().to_lowercase().as_str() {
            "no-encryption" | "none" => Ok(Self::NoEncryption),
            "open" => Ok(Self::Open),
            "sharedkey" | "shared" => Ok(Self::SharedKey),
            "psk" | "wpa-psk" => Ok(Self::Psk),
            "eap" | "wpa-eap" => Ok(Self::Eap),
            v => Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid wireless authentication mode {v}, valid values \
                     are: no-encryption, open, sharedkey, psk, eap"
                ),
            )),
        }
    }
}

impl From<WirelessAuthMode> for String {
    fn from(v: WirelessAuthMode) -> Self {
        v.as_str().to_string()
    }
}

impl TryFrom<String> for WirelessAuthMode {
    type Error = SysnetError;

    fn try_from(v: String) -> Result<Self, SysnetError> {
        Self::from_str(v.as_str())
    }
}

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
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Wireless connection, all settings stored in `WIRELESS_*` variables.
pub struct WirelessConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    /// `managed`, `ad-hoc` or `master`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub essid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nwid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<WirelessAuthMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_psk: Option<String>,
    /// WEP keys, index is the key number.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_key: Option<u8>,
    /// Access point MAC address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_scanmode: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eap_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eap_auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_anonymous_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

impl WirelessConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for WirelessConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Wireless
    }

    fn propose_conn_specific(&mut self) {
        if self.mode.is_none() {
            self.mode = Some(DEFAULT_WIRELESS_MODE.to_string());
        }
        if self.auth_mode.is_none() {
            self.auth_mode = Some(if self.wpa_psk.is_some() {
                WirelessAuthMode::Psk
            } else {
                WirelessAuthMode::Open
            });
        }
    }

    fn hide_secrets(&mut self) {
        for secret in [self.wpa_psk.as_mut(), self.wpa_password.as_mut()]
            .into_iter()
            .flatten()
        {
            secret.replace_range(.., HIDE_PASSWORD_STR);
        }
        for key in self.keys.iter_mut().filter(|k| !k.is_empty()) {
            key.replace_range(.., HIDE_PASSWORD_STR);
        }
    }
}
