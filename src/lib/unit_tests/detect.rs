// SPDX-License-Identifier: Apache-2.0

use crate::{
    InterfaceSection, InterfaceType, detect_type,
    sysconfig::{IfcfgTypeSource, KeyValueFile, KeyValueStyle},
};

fn detect(name: &str, content: &str) -> Option<InterfaceType> {
    detect_with_hw(name, content, None)
}

fn detect_with_hw(
    name: &str,
    content: &str,
    hardware_type: Option<InterfaceType>,
) -> Option<InterfaceType> {
    let file = KeyValueFile::parse(content, KeyValueStyle::Sysconfig);
    detect_type(&IfcfgTypeSource {
        name,
        file: &file,
        hardware_type,
    })
}

#[test]
fn test_bonding_flag_beats_etherdevice() {
    assert_eq!(
        detect("bond0", "BONDING_MASTER='yes'\nETHERDEVICE='eth0'\n"),
        Some(InterfaceType::Bonding)
    );
}

#[test]
fn test_wireless_mode_only() {
    assert_eq!(
        detect("wlan0", "WIRELESS_MODE='managed'\n"),
        Some(InterfaceType::Wireless)
    );
}

#[test]
fn test_key_existence_beats_interfacetype() {
    assert_eq!(
        detect("vlan10", "ETHERDEVICE=eth0\nINTERFACETYPE=dummy\n"),
        Some(InterfaceType::Vlan)
    );
}

#[test]
fn test_interfacetype_override() {
    assert_eq!(
        detect("dummy0", "INTERFACETYPE='dummy'\n"),
        Some(InterfaceType::Dummy)
    );
    assert_eq!(
        detect("lo1", "INTERFACETYPE=lo\n"),
        Some(InterfaceType::Loopback)
    );
}

#[test]
fn test_invalid_interfacetype_is_unknown() {
    assert_eq!(detect("foo0", "INTERFACETYPE='bogus'\n"), None);
}

#[test]
fn test_invalid_explicit_flag_is_unknown() {
    assert_eq!(
        detect("bond0", "BONDING_MASTER='maybe'\nBONDING_SLAVE0='eth1'\n"),
        None
    );
    assert_eq!(detect("br0", "BRIDGE=1\n"), None);
}

#[test]
fn test_explicit_flag_set_to_no() {
    assert_eq!(
        detect("eth0.5", "BRIDGE='no'\nETHERDEVICE='eth0'\n"),
        Some(InterfaceType::Vlan)
    );
    assert_eq!(
        detect("eth1", "BONDING_MASTER=no\n"),
        Some(InterfaceType::Ethernet)
    );
}

#[test]
fn test_tunnel() {
    assert_eq!(detect("tap0", "TUNNEL=tap\n"), Some(InterfaceType::Tap));
    assert_eq!(detect("tun0", "TUNNEL='tun'\n"), Some(InterfaceType::Tun));
    assert_eq!(detect("gre1", "TUNNEL='gre'\n"), None);
}

#[test]
fn test_loopback_name() {
    assert_eq!(
        detect("lo", "BOOTPROTO=static\n"),
        Some(InterfaceType::Loopback)
    );
}

#[test]
fn test_name_beats_hardware_and_fallback() {
    assert_eq!(
        detect_with_hw("ib0", "", Some(InterfaceType::Infiniband)),
        Some(InterfaceType::Infiniband)
    );
    assert_eq!(
        detect("eth0", "BOOTPROTO=dhcp\n"),
        Some(InterfaceType::Ethernet)
    );
}

#[test]
fn test_profile_section_detect() {
    let section: InterfaceSection = serde_yaml::from_str(
        r#"
        device: br0
        bridge: true
        etherdevice: eth0
        "#,
    )
    .unwrap();
    assert_eq!(detect_type(&section), Some(InterfaceType::Bridge));

    let section: InterfaceSection = serde_yaml::from_str(
        r#"
        device: ppp0
        modem_device: /dev/modem
        "#,
    )
    .unwrap();
    assert_eq!(detect_type(&section), Some(InterfaceType::Ppp));
}
