// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{InterfaceType, JsonDisplay, S390Channels, SysnetError};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Hardware facts of a physical network device
pub struct Hardware {
    /// Kernel name at probe time.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_mac: Option<String>,
    /// Bus ID like `0000:00:19.0` for PCI or `0.0.0700` for CCW.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type reported by kernel, used as last resort of type detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iface_type: Option<InterfaceType>,
    /// Device is on a hot-pluggable bus like USB or PCMCIA.
    #[serde(default)]
    pub hotplug: bool,
    /// Channel IDs of S/390 group device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<S390Channels>,
}

impl Hardware {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Permanent MAC address if known, otherwise the current one.
    pub fn mac_for_udev(&self) -> Option<&str> {
        self.permanent_mac.as_deref().or(self.mac.as_deref())
    }
}

/// Source of physical network device facts.
pub trait HardwareProbe {
    fn probe(&self) -> Result<Vec<Hardware>, SysnetError>;
}

/// [HardwareProbe] returning a fixed list, used when the devices are known
/// in advance (offline root, profile import, testing).
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(transparent)]
#[non_exhaustive]
pub struct StaticHardware(pub Vec<Hardware>);

impl StaticHardware {
    pub fn new(hardware: Vec<Hardware>) -> Self {
        Self(hardware)
    }
}

impl HardwareProbe for StaticHardware {
    fn probe(&self) -> Result<Vec<Hardware>, SysnetError> {
        Ok(self.0.clone())
    }
}
