// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BaseConnection, InterfaceType, JsonDisplay, SysnetConnection};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TunTapMode {
    /// Layer 3, sysconfig `TUNNEL=tun`
    #[default]
    Tun,
    /// Layer 2, sysconfig `TUNNEL=tap`
    Tap,
}

impl TunTapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tun => "tun",
            Self::Tap => "tap",
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Persistent TUN or TAP device
pub struct TunTapConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    #[serde(default)]
    pub mode: TunTapMode,
    /// Sysconfig `TUNNEL_SET_OWNER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Sysconfig `TUNNEL_SET_GROUP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl TunTapConnection {
    pub fn new(name: &str, mode: TunTapMode) -> Self {
        Self {
            base: BaseConnection::new(name),
            mode,
            ..Default::default()
        }
    }
}

impl SysnetConnection for TunTapConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        match self.mode {
            TunTapMode::Tun => InterfaceType::Tun,
            TunTapMode::Tap => InterfaceType::Tap,
        }
    }
}
