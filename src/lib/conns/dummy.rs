// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BaseConnection, InterfaceType, JsonDisplay, SysnetConnection};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Dummy connection, stored with `INTERFACETYPE=dummy`
pub struct DummyConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
}

impl DummyConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
        }
    }
}

impl SysnetConnection for DummyConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Dummy
    }
}
