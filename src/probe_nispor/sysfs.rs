// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use sysnet::{InterfaceType, S390Channels};

const DEFAULT_SYSFS_ROOT: &str = "/sys";
const HOTPLUG_SUBSYSTEMS: [&str; 2] = ["usb", "pcmcia"];
const CCWGROUP_SUBSYSTEM: &str = "ccwgroup";

/// Device facts under `/sys/class/net/<iface>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl Sysfs {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn iface_dir(&self, iface_name: &str) -> PathBuf {
        self.root.join("class/net").join(iface_name)
    }

    fn device_dir(&self, iface_name: &str) -> PathBuf {
        self.iface_dir(iface_name).join("device")
    }

    /// Only interfaces backed by a bus device are physical.
    pub(crate) fn is_physical(&self, iface_name: &str) -> bool {
        self.device_dir(iface_name).exists()
    }

    pub(crate) fn busid(&self, iface_name: &str) -> Option<String> {
        link_name(&self.device_dir(iface_name))
    }

    pub(crate) fn driver(&self, iface_name: &str) -> Option<String> {
        link_name(&self.device_dir(iface_name).join("driver"))
    }

    fn subsystem(&self, iface_name: &str) -> Option<String> {
        link_name(&self.device_dir(iface_name).join("subsystem"))
    }

    pub(crate) fn is_hotplug(&self, iface_name: &str) -> bool {
        self.subsystem(iface_name)
            .map(|s| HOTPLUG_SUBSYSTEMS.contains(&s.as_str()))
            .unwrap_or_default()
    }

    pub(crate) fn is_wireless(&self, iface_name: &str) -> bool {
        let dir = self.iface_dir(iface_name);
        dir.join("wireless").exists() || dir.join("phy80211").exists()
    }

    /// S/390 group device type decided by its driver.
    pub(crate) fn s390_type(&self, iface_name: &str) -> Option<InterfaceType> {
        if self.subsystem(iface_name).as_deref() != Some(CCWGROUP_SUBSYSTEM) {
            return None;
        }
        match self.driver(iface_name).as_deref() {
            Some("qeth") => Some(InterfaceType::Qeth),
            Some("ctcm") => Some(InterfaceType::Ctc),
            Some("lcs") => Some(InterfaceType::Lcs),
            driver => {
                log::debug!(
                    "Unknown ccwgroup driver {driver:?} of {iface_name}"
                );
                None
            }
        }
    }

    /// Read, write and data channel of a ccwgroup device.
    pub(crate) fn channels(&self, iface_name: &str) -> Option<S390Channels> {
        let dir = self.device_dir(iface_name);
        let read = link_name(&dir.join("cdev0"))?;
        let write = link_name(&dir.join("cdev1"))?;
        let data = link_name(&dir.join("cdev2"));
        Some(S390Channels::new(&read, &write, data.as_deref()))
    }
}

fn link_name(path: &Path) -> Option<String> {
    match std::fs::read_link(path) {
        Ok(target) => target
            .file_name()
            .map(|n| n.to_string_lossy().to_string()),
        Err(e) => {
            log::trace!("Failed to read link {}: {e}", path.display());
            None
        }
    }
}
