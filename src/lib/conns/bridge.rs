// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BaseConnection, InterfaceType, JsonDisplay, SysnetConnection};

const DEFAULT_FORWARD_DELAY: u32 = 15;

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Linux bridge connection
pub struct BridgeConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    #[serde(default)]
    pub ports: Vec<String>,
    /// Spanning tree protocol, sysconfig `BRIDGE_STP` on/off.
    #[serde(default)]
    pub stp: bool,
    /// Seconds, sysconfig `BRIDGE_FORWARDDELAY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_delay: Option<u32>,
}

impl BridgeConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for BridgeConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Bridge
    }

    fn ports(&self) -> Option<Vec<&str>> {
        Some(self.ports.iter().map(|s| s.as_str()).collect())
    }

    fn propose_conn_specific(&mut self) {
        if self.forward_delay.is_none() {
            self.forward_delay = Some(DEFAULT_FORWARD_DELAY);
        }
    }
}
