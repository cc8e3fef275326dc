// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, ErrorKind, InterfaceType, JsonDisplay, SysnetConnection,
    SysnetError,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum InfinibandMode {
    #[default]
    Datagram,
    Connected,
}

impl InfinibandMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Datagram => "datagram",
            Self::Connected => "connected",
        }
    }
}

impl FromStr for InfinibandMode {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        match s.trim().to_lowercase().as_str() {
            "datagram" => Ok(Self::Datagram),
            "connected" => Ok(Self::Connected),
            v => Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid IPoIB mode {v}, valid values are: datagram, \
                     connected"
                ),
            )),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// IP over InfiniBand connection
pub struct InfinibandConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    /// Sysconfig `IPOIB_MODE`, None means kernel default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipoib_mode: Option<InfinibandMode>,
}

impl InfinibandConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for InfinibandConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Infiniband
    }
}
