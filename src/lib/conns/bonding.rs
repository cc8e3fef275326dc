// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BaseConnection, InterfaceType, JsonDisplay, SysnetConnection};

const DEFAULT_BONDING_OPTIONS: &str = "mode=active-backup miimon=100";

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Bond connection
///
/// Example YAML output:
/// ```yaml
/// name: bond0
/// interface: bond0
/// type: bonding
/// bootproto: dhcp
/// slaves:
/// - eth1
/// - eth2
/// options: mode=802.3ad miimon=100
/// ```
pub struct BondingConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    /// Port interface names in `BONDING_SLAVE<n>` order.
    #[serde(default)]
    pub slaves: Vec<String>,
    /// Kernel module options, sysconfig `BONDING_MODULE_OPTS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl BondingConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for BondingConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Bonding
    }

    fn ports(&self) -> Option<Vec<&str>> {
        Some(self.slaves.iter().map(|s| s.as_str()).collect())
    }

    fn propose_conn_specific(&mut self) {
        if self.options.is_none() {
            self.options = Some(DEFAULT_BONDING_OPTIONS.to_string());
        }
    }
}
