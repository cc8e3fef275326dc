// SPDX-License-Identifier: Apache-2.0

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, BootProtocol, InterfaceType, IpAddress, IpConfig,
    JsonDisplay, Startmode, SysnetConnection,
};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct LoopbackConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
}

impl LoopbackConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
        }
    }
}

impl SysnetConnection for LoopbackConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Loopback
    }

    /// Match the `ifcfg-lo` shipped by distribution: never shut down and
    /// holding `127.0.0.1/8`.
    fn propose_conn_specific(&mut self) {
        self.base.startmode = Some(Startmode::Nfsroot);
        self.base.bootproto = BootProtocol::Static;
        if self.base.ip.is_none() {
            self.base.ip = Some(IpConfig::new(IpAddress::new(
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                Some(8),
            )));
        }
    }
}
