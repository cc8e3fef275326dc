// SPDX-License-Identifier: Apache-2.0

mod collection;
mod detect;
mod profile;
mod propose;
mod rename;
mod routes;
mod sysconfig;

use std::path::Path;

use crate::{Hardware, InterfaceType};

pub(crate) fn write_file(root: &Path, rel_path: &str, content: &str) {
    let path = root.join(rel_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub(crate) fn read_file(root: &Path, rel_path: &str) -> String {
    std::fs::read_to_string(root.join(rel_path)).unwrap()
}

pub(crate) fn new_nic(name: &str, mac: &str, busid: &str) -> Hardware {
    let mut hw = Hardware::new(name);
    hw.mac = Some(mac.to_string());
    hw.busid = Some(busid.to_string());
    hw.iface_type = Some(InterfaceType::Ethernet);
    hw
}
