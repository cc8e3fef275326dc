// SPDX-License-Identifier: Apache-2.0

use std::{os::unix::fs::symlink, path::Path};

use sysnet::{InterfaceType, S390Channels};

use crate::{NisporProbe, probe::np_iface_type_to_sysnet, sysfs::Sysfs};

fn mkdir(root: &Path, rel: &str) {
    std::fs::create_dir_all(root.join(rel)).unwrap();
}

fn link(root: &Path, rel: &str, target: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    mkdir(root, target);
    symlink(root.join(target), path).unwrap();
}

/// eth0 on PCI, usb0 on USB, eth4 as qeth group device, wlan0 wireless on
/// PCI and virtual br0.
fn fake_sysfs() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let pci = "devices/pci0000:00/0000:00:03.0";
    link(root, "class/net/eth0/device", pci);
    link(root, &format!("{pci}/driver"), "bus/pci/drivers/e1000e");
    link(root, &format!("{pci}/subsystem"), "bus/pci");

    let usb = "devices/pci0000:00/0000:00:14.0/usb1/1-1/1-1:1.0";
    link(root, "class/net/usb0/device", usb);
    link(root, &format!("{usb}/driver"), "bus/usb/drivers/cdc_ether");
    link(root, &format!("{usb}/subsystem"), "bus/usb");

    let ccw = "devices/qeth/0.0.0700";
    link(root, "class/net/eth4/device", ccw);
    link(root, &format!("{ccw}/driver"), "bus/ccwgroup/drivers/qeth");
    link(root, &format!("{ccw}/subsystem"), "bus/ccwgroup");
    link(root, &format!("{ccw}/cdev0"), "devices/css0/0.0.0000/0.0.0700");
    link(root, &format!("{ccw}/cdev1"), "devices/css0/0.0.0001/0.0.0701");
    link(root, &format!("{ccw}/cdev2"), "devices/css0/0.0.0002/0.0.0702");

    let wifi = "devices/pci0000:00/0000:03:00.0";
    link(root, "class/net/wlan0/device", wifi);
    link(root, "class/net/wlan0/phy80211", "devices/phy0");

    mkdir(root, "class/net/br0/bridge");
    dir
}

#[test]
fn test_sysfs_pci_device() {
    let dir = fake_sysfs();
    let sysfs = Sysfs::new(dir.path());

    assert!(sysfs.is_physical("eth0"));
    assert_eq!(sysfs.busid("eth0").as_deref(), Some("0000:00:03.0"));
    assert_eq!(sysfs.driver("eth0").as_deref(), Some("e1000e"));
    assert!(!sysfs.is_hotplug("eth0"));
    assert!(!sysfs.is_wireless("eth0"));
    assert_eq!(sysfs.s390_type("eth0"), None);
}

#[test]
fn test_sysfs_hotplug_and_wireless() {
    let dir = fake_sysfs();
    let sysfs = Sysfs::new(dir.path());

    assert!(sysfs.is_hotplug("usb0"));
    assert_eq!(sysfs.busid("usb0").as_deref(), Some("1-1:1.0"));
    assert!(sysfs.is_wireless("wlan0"));
    assert_eq!(sysfs.driver("wlan0"), None);
}

#[test]
fn test_sysfs_virtual_device() {
    let dir = fake_sysfs();
    let sysfs = Sysfs::new(dir.path());

    assert!(!sysfs.is_physical("br0"));
    assert_eq!(sysfs.busid("br0"), None);
    assert!(!sysfs.is_physical("not-exist"));
}

#[test]
fn test_sysfs_ccwgroup_device() {
    let dir = fake_sysfs();
    let sysfs = Sysfs::new(dir.path());

    assert_eq!(sysfs.s390_type("eth4"), Some(InterfaceType::Qeth));
    assert_eq!(
        sysfs.channels("eth4"),
        Some(S390Channels::new("0.0.0700", "0.0.0701", Some("0.0.0702")))
    );
    assert_eq!(sysfs.busid("eth4").as_deref(), Some("0.0.0700"));
}

#[test]
fn test_np_iface_to_hardware() {
    let dir = fake_sysfs();
    let probe = NisporProbe::with_sysfs_root(dir.path());

    let mut np_iface = nispor::Iface::default();
    np_iface.name = "eth4".to_string();
    np_iface.iface_type = nispor::IfaceType::Ethernet;
    np_iface.mac_address = "02:00:00:AB:CD:EF".to_string();
    let hw = probe.np_iface_to_hardware(&np_iface).unwrap();
    assert_eq!(hw.iface_type, Some(InterfaceType::Qeth));
    assert_eq!(hw.mac.as_deref(), Some("02:00:00:ab:cd:ef"));
    assert_eq!(hw.permanent_mac, None);
    assert!(hw.channels.is_some());

    np_iface.name = "br0".to_string();
    np_iface.iface_type = nispor::IfaceType::Bridge;
    assert!(probe.np_iface_to_hardware(&np_iface).is_none());
}

#[test]
fn test_iface_type_mapping() {
    assert_eq!(
        np_iface_type_to_sysnet(&nispor::IfaceType::Ipoib),
        Some(InterfaceType::Infiniband)
    );
    assert_eq!(np_iface_type_to_sysnet(&nispor::IfaceType::Vxlan), None);
}
