// SPDX-License-Identifier: Apache-2.0

use sysnet::{Hardware, HardwareProbe, InterfaceType, SysnetError};

use crate::{error::np_error_to_sysnet, sysfs::Sysfs};

/// [HardwareProbe] of the running system: interfaces come from kernel
/// netlink through nispor, bus facts from sysfs.
#[derive(Debug, Clone, Default)]
pub struct NisporProbe {
    sysfs: Sysfs,
}

impl NisporProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read bus facts from another sysfs mount point.
    pub fn with_sysfs_root(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            sysfs: Sysfs::new(root),
        }
    }

    pub(crate) fn np_iface_to_hardware(
        &self,
        np_iface: &nispor::Iface,
    ) -> Option<Hardware> {
        let name = np_iface.name.as_str();
        if !self.sysfs.is_physical(name) {
            log::debug!("Skipping {name} which is not a physical device");
            return None;
        }
        let mut hw = Hardware::new(name);
        hw.mac = non_empty(&np_iface.mac_address).map(|m| m.to_lowercase());
        hw.permanent_mac = get_permanent_mac_address(np_iface);
        hw.busid = self.sysfs.busid(name);
        hw.driver = self.sysfs.driver(name);
        hw.hotplug = self.sysfs.is_hotplug(name);
        hw.iface_type = if let Some(s390_type) = self.sysfs.s390_type(name) {
            hw.channels = self.sysfs.channels(name);
            Some(s390_type)
        } else if self.sysfs.is_wireless(name) {
            Some(InterfaceType::Wireless)
        } else {
            np_iface_type_to_sysnet(&np_iface.iface_type)
        };
        Some(hw)
    }
}

impl HardwareProbe for NisporProbe {
    fn probe(&self) -> Result<Vec<Hardware>, SysnetError> {
        let mut filter = nispor::NetStateFilter::default();
        // Routes are not needed for hardware facts
        filter.route = None;
        let np_state = nispor::NetState::retrieve_with_filter(&filter)
            .map_err(np_error_to_sysnet)?;

        let mut np_ifaces: Vec<&nispor::Iface> =
            np_state.ifaces.values().collect();
        np_ifaces.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        let ret: Vec<Hardware> = np_ifaces
            .into_iter()
            .filter_map(|i| self.np_iface_to_hardware(i))
            .collect();
        log::info!("Found {} physical network devices", ret.len());
        Ok(ret)
    }
}

pub(crate) fn np_iface_type_to_sysnet(
    np_iface_type: &nispor::IfaceType,
) -> Option<InterfaceType> {
    match np_iface_type {
        nispor::IfaceType::Ethernet => Some(InterfaceType::Ethernet),
        nispor::IfaceType::Ipoib => Some(InterfaceType::Infiniband),
        nispor::IfaceType::Bond => Some(InterfaceType::Bonding),
        nispor::IfaceType::Bridge => Some(InterfaceType::Bridge),
        nispor::IfaceType::Vlan => Some(InterfaceType::Vlan),
        nispor::IfaceType::Dummy => Some(InterfaceType::Dummy),
        nispor::IfaceType::Loopback => Some(InterfaceType::Loopback),
        nispor::IfaceType::Tun => Some(InterfaceType::Tun),
        _ => {
            log::debug!("Unsupported nispor interface type {np_iface_type:?}");
            None
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn get_permanent_mac_address(iface: &nispor::Iface) -> Option<String> {
    if let Some(mac) = non_empty(&iface.permanent_mac_address) {
        return Some(mac.to_lowercase());
    }
    // Bond port holds the MAC address it had before joining the bond
    iface
        .bond_subordinate
        .as_ref()
        .and_then(|info| non_empty(&info.perm_hwaddr))
        .map(|m| m.to_lowercase())
}
