// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Please report this as bug to upstream
    Bug,
    /// Invalid argument
    InvalidArgument,
    /// Requested interface, connection or file not found
    NotFound,
    /// Not supported
    NoSupport,
    /// Failed to read or write configuration file
    IoFailure,
    /// Name already used by another entry of the collection
    Duplicate,
}

// Try not implement From for SysnetError here unless you are sure this
// error should always convert to certain type of ErrorKind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SysnetError {
    pub kind: ErrorKind,
    pub msg: String,
}

impl std::fmt::Display for SysnetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl SysnetError {
    pub fn new(kind: ErrorKind, msg: String) -> Self {
        Self { kind, msg }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        self.msg.as_str()
    }
}

impl std::error::Error for SysnetError {}

impl From<serde_json::Error> for SysnetError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Bug, format!("serde_json::Error: {e}"))
    }
}

impl From<serde_yaml::Error> for SysnetError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("serde_yaml::Error: {e}"),
        )
    }
}

impl From<std::io::Error> for SysnetError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::IoFailure, format!("std::io::Error: {e}"))
    }
}

impl From<std::net::AddrParseError> for SysnetError {
    fn from(e: std::net::AddrParseError) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("Invalid IP address: {e}"),
        )
    }
}

pub(crate) fn io_error_with_path(
    e: std::io::Error,
    path: &std::path::Path,
) -> SysnetError {
    SysnetError::new(
        ErrorKind::IoFailure,
        format!("Failed to access {}: {e}", path.display()),
    )
}
