// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{JsonDisplay, Startmode, SysnetError, error::io_error_with_path};

const SYSCONFIG_NETWORK_DIR: &str = "etc/sysconfig/network";
const ROUTES_FILE: &str = "routes";
const NETWORK_CONFIG_FILE: &str = "config";
const SYSCTL_FILE: &str = "etc/sysctl.d/70-yast.conf";
const UDEV_RULES_FILE: &str = "etc/udev/rules.d/70-persistent-net.rules";
const HOSTS_FILE: &str = "etc/hosts";
const HOSTNAME_FILE: &str = "etc/hostname";

/// Facts about the running system used to propose connection defaults.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case", default)]
#[non_exhaustive]
pub struct ProposeContext {
    /// Root file system is mounted over network (NFS, iSCSI, FCoE).
    pub root_on_network: bool,
    /// Running on laptop hardware where `ifplugd` makes sense.
    pub laptop: bool,
    /// Product default start mode for new connections.
    pub default_startmode: Startmode,
}

/// Where to find the configuration files and how to propose defaults.
///
/// Example YAML:
/// ```yaml
/// root: /mnt
/// propose:
///   root-on-network: false
///   laptop: true
///   default-startmode:
///     name: ifplugd
///     priority: 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay)]
#[serde(rename_all = "kebab-case", default)]
#[non_exhaustive]
pub struct SysnetConfig {
    /// All configuration paths are relative to this directory.
    pub root: PathBuf,
    pub propose: ProposeContext,
}

impl Default for SysnetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            propose: ProposeContext::default(),
        }
    }
}

impl SysnetConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, SysnetError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| io_error_with_path(e, path))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn sysconfig_dir(&self) -> PathBuf {
        self.root.join(SYSCONFIG_NETWORK_DIR)
    }

    pub fn ifcfg_path(&self, iface_name: &str) -> PathBuf {
        self.sysconfig_dir().join(format!("ifcfg-{iface_name}"))
    }

    pub fn routes_path(&self) -> PathBuf {
        self.sysconfig_dir().join(ROUTES_FILE)
    }

    pub fn ifroute_path(&self, iface_name: &str) -> PathBuf {
        self.sysconfig_dir().join(format!("ifroute-{iface_name}"))
    }

    pub fn network_config_path(&self) -> PathBuf {
        self.sysconfig_dir().join(NETWORK_CONFIG_FILE)
    }

    pub fn sysctl_path(&self) -> PathBuf {
        self.root.join(SYSCTL_FILE)
    }

    pub fn udev_rules_path(&self) -> PathBuf {
        self.root.join(UDEV_RULES_FILE)
    }

    pub fn hosts_path(&self) -> PathBuf {
        self.root.join(HOSTS_FILE)
    }

    pub fn hostname_path(&self) -> PathBuf {
        self.root.join(HOSTNAME_FILE)
    }
}
