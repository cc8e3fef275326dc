// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, ErrorKind, InterfaceType, JsonDisplay, SysnetConnection,
    SysnetError,
};

/// Channel IDs of a S/390 group device, each in the `<css>.<ssid>.<devno>`
/// format, e.g. `0.0.0700`.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct S390Channels {
    pub read: String,
    pub write: String,
    /// Only QETH devices use a data channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl S390Channels {
    pub fn new(read: &str, write: &str, data: Option<&str>) -> Self {
        Self {
            read: read.to_string(),
            write: write.to_string(),
            data: data.map(|d| d.to_string()),
        }
    }

    /// Colon separated channel IDs, e.g. `0.0.0700:0.0.0701:0.0.0702`.
    pub fn to_chanids(&self) -> String {
        let mut ret = vec![self.read.as_str(), self.write.as_str()];
        if let Some(data) = self.data.as_deref() {
            ret.push(data);
        }
        ret.join(":")
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty() && self.data.is_none()
    }
}

impl FromStr for S390Channels {
    type Err = SysnetError;

    /// Accept both colon and white space as separator.
    fn from_str(s: &str) -> Result<Self, SysnetError> {
        let ids: Vec<&str> = s
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|i| !i.is_empty())
            .collect();
        if !(2..=3).contains(&ids.len()) {
            return Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Invalid channel IDs '{s}', expecting read, write and \
                     optional data channel"
                ),
            ));
        }
        for id in &ids {
            validate_channel_id(id)?;
        }
        Ok(Self {
            read: ids[0].to_lowercase(),
            write: ids[1].to_lowercase(),
            data: ids.get(2).map(|d| d.to_lowercase()),
        })
    }
}

fn validate_channel_id(id: &str) -> Result<(), SysnetError> {
    let parts: Vec<&str> = id.split('.').collect();
    let valid = parts.len() == 3
        && parts[0].len() == 1
        && parts[1].len() == 1
        && parts[2].len() == 4
        && parts
            .iter()
            .all(|p| p.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(SysnetError::new(
            ErrorKind::InvalidArgument,
            format!("Invalid channel ID {id}, expecting format like 0.0.0700"),
        ))
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// QDIO Ethernet connection
pub struct QethConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    #[serde(default)]
    pub channels: S390Channels,
    #[serde(default)]
    pub layer2: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_number: Option<u8>,
}

impl QethConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for QethConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Qeth
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Channel-to-channel connection
pub struct CtcConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    #[serde(default)]
    pub channels: S390Channels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<u8>,
}

impl CtcConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for CtcConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Ctc
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// LAN channel station connection
pub struct LcsConnection {
    #[serde(flatten)]
    pub base: BaseConnection,
    #[serde(default)]
    pub channels: S390Channels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<u8>,
    /// LANCMD timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl LcsConnection {
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseConnection::new(name),
            ..Default::default()
        }
    }
}

impl SysnetConnection for LcsConnection {
    fn base_conn(&self) -> &BaseConnection {
        &self.base
    }

    fn base_conn_mut(&mut self) -> &mut BaseConnection {
        &mut self.base
    }

    fn iface_type(&self) -> InterfaceType {
        InterfaceType::Lcs
    }
}
