// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, SysnetError};

/// Policy for when a connection is activated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case", tag = "name")]
#[non_exhaustive]
pub enum Startmode {
    /// Activated at boot time.
    #[default]
    Auto,
    /// Activated when the device appears.
    Hotplug,
    /// Activated on cable plug, the lowest priority connection wins.
    /// Unset priority means 0.
    Ifplugd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u32>,
    },
    Manual,
    /// Root file system is mounted over this connection, never shut down.
    Nfsroot,
    Off,
}

impl Startmode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Hotplug => "hotplug",
            Self::Ifplugd { .. } => "ifplugd",
            Self::Manual => "manual",
            Self::Nfsroot => "nfsroot",
            Self::Off => "off",
        }
    }

    /// Build a start mode from its name, `priority` only used by `ifplugd`.
    pub fn from_name(
        name: &str,
        priority: Option<u32>,
    ) -> Result<Self, SysnetError> {
        match name.trim().to_lowercase().as_str() {
            // The `onboot`, `on` and `boot` are sysconfig aliases of `auto`
            "auto" | "onboot" | "on" | "boot" => Ok(Self::Auto),
            "hotplug" => Ok(Self::Hotplug),
            "ifplugd" => Ok(Self::Ifplugd { priority }),
            "manual" => Ok(Self::Manual),
            "nfsroot" => Ok(Self::Nfsroot),
            "off" => Ok(Self::Off),
            n => Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid start mode {n}, valid values are: auto, \
                     hotplug, ifplugd, manual, nfsroot, off"
                ),
            )),
        }
    }
}

impl std::fmt::Display for Startmode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ifplugd {
                priority: Some(priority),
            } => write!(f, "ifplugd({priority})"),
            _ => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for Startmode {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        Self::from_name(s, None)
    }
}
