// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BaseConnection, InterfaceType, JsonDisplay, SysnetConnection};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// VLAN connection
pub struct VlanConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    /// Sysconfig `ETHERDEVICE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

impl VlanConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for VlanConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Vlan
    }

    fn parent(&self) -> Option<&str> {
        self.parent_device.as_deref()
    }

    /// Both the VLAN ID and parent are guessed from `<parent>.<id>` naming
    /// when undefined.
    fn propose_conn_specific(&mut self) {
        if let Some((parent, id)) = vlan_info_from_name(self.base.iface_name())
        {
            if self.vlan_id.is_none() {
                self.vlan_id = Some(id);
            }
            if self.parent_device.is_none() {
                self.parent_device = Some(parent.to_string());
            }
        }
    }
}

fn vlan_info_from_name(name: &str) -> Option<(&str, u16)> {
    let (parent, id) = name.rsplit_once('.')?;
    if parent.is_empty() {
        return None;
    }
    id.parse::<u16>().ok().map(|id| (parent, id))
}
