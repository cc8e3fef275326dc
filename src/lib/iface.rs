// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    ConnectionId, ErrorKind, Hardware, InterfaceType, JsonDisplay, SysnetError,
};

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
    JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// The udev matching key used to pin a kernel device name
pub enum RenamingMechanism {
    /// No udev rule for this interface.
    #[default]
    None,
    /// Rule matching `ATTR{address}`.
    Mac,
    /// Rule matching `KERNELS`.
    BusId,
}

impl FromStr for RenamingMechanism {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "none" => Ok(Self::None),
            "mac" => Ok(Self::Mac),
            "bus-id" | "busid" => Ok(Self::BusId),
            v => Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid renaming mechanism {v}, valid values are: \
                     none, mac, bus-id"
                ),
            )),
        }
    }
}

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
    JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum InterfaceKind {
    /// Backed by hardware, created from probing.
    #[default]
    Physical,
    /// Created on demand for a connection of virtual type.
    Virtual,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// A concrete network device
pub struct Interface {
    pub name: String,
    /// Name before the last rename, cleared once written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,
    #[serde(rename = "type")]
    pub iface_type: InterfaceType,
    #[serde(default)]
    pub kind: InterfaceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hardware>,
    #[serde(default)]
    pub renaming_mechanism: RenamingMechanism,
    /// Connection defining this interface. Only set for virtual interfaces.
    #[serde(skip)]
    pub connection: Option<ConnectionId>,
}

impl Interface {
    pub fn new_physical(hardware: Hardware) -> Self {
        Self {
            name: hardware.name.clone(),
            iface_type: hardware.iface_type.unwrap_or(InterfaceType::Ethernet),
            kind: InterfaceKind::Physical,
            hardware: Some(hardware),
            ..Default::default()
        }
    }

    pub fn new_virtual(
        name: &str,
        iface_type: InterfaceType,
        connection: ConnectionId,
    ) -> Self {
        Self {
            name: name.to_string(),
            iface_type,
            kind: InterfaceKind::Virtual,
            connection: Some(connection),
            ..Default::default()
        }
    }

    /// Physical interface known from configuration only, e.g. S/390 device
    /// not activated yet.
    pub fn new_unprobed(name: &str, iface_type: InterfaceType) -> Self {
        Self {
            name: name.to_string(),
            iface_type,
            kind: InterfaceKind::Physical,
            ..Default::default()
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.kind == InterfaceKind::Virtual
    }

    pub fn is_physical(&self) -> bool {
        self.kind == InterfaceKind::Physical
    }

    pub fn mac(&self) -> Option<&str> {
        self.hardware.as_ref().and_then(|h| h.mac_for_udev())
    }

    pub fn busid(&self) -> Option<&str> {
        self.hardware.as_ref().and_then(|h| h.busid.as_deref())
    }

    pub fn is_hotplug(&self) -> bool {
        self.hardware.as_ref().map(|h| h.hotplug).unwrap_or_default()
    }
}
