// SPDX-License-Identifier: Apache-2.0

use std::{net::IpAddr, str::FromStr};

use super::{
    attrs::section_to_file,
    section::{
        DnsSection, InterfaceSection, NetworkingSection, RoutingSection,
        S390DeviceSection, UdevRuleSection,
    },
};
use crate::{
    ConnectionConfig, ConnectionId, Dns, HardwareProbe, Interface,
    InterfaceType, Issues, NetworkConfig, ReadResult, Route,
    RenamingMechanism, S390Channels, SysnetError, TypeSource, UdevRule,
    detect_type,
    sysconfig::{apply_udev_rules, load_conn, parse_bool},
    udev::{UDEV_BUSID_KEY, UDEV_MAC_KEY},
};

const UNSET: &str = "-";

/// [TypeSource] of a profile entry completed with the type of the matching
/// hardware.
struct SectionTypeSource<'a> {
    section: &'a InterfaceSection,
    hardware_type: Option<InterfaceType>,
}

impl TypeSource for SectionTypeSource<'_> {
    fn iface_name(&self) -> &str {
        self.section.iface_name()
    }

    fn value(&self, key: &str) -> Option<String> {
        self.section.value(key)
    }

    fn hardware_type(&self) -> Option<InterfaceType> {
        self.hardware_type
    }
}

/// Build [NetworkConfig] from the `networking` section of an installation
/// profile.
///
/// Entries holding invalid values are reported in [ReadResult::issues] and
/// skipped or left at default, only hardware probing can fail the import.
pub struct ProfileReader<'a> {
    probe: &'a dyn HardwareProbe,
}

impl<'a> ProfileReader<'a> {
    pub fn new(probe: &'a dyn HardwareProbe) -> Self {
        Self { probe }
    }

    pub fn read(
        &self,
        section: &NetworkingSection,
    ) -> Result<ReadResult, SysnetError> {
        let mut config = NetworkConfig::new();
        let mut issues = Issues::new();

        for hw in self.probe.probe()? {
            if let Err(e) = config.interfaces.push(Interface::new_physical(hw))
            {
                issues.add("hardware", e.msg().to_string());
            }
        }
        let rules = read_udev_rules(&section.net_udev, &mut issues);
        apply_udev_rules(&mut config, &rules);
        for (idx, iface) in section.interfaces.iter().enumerate() {
            read_interface(idx, iface, &mut config, &mut issues);
        }
        for (idx, device) in section.s390_devices.iter().enumerate() {
            read_s390_device(idx, device, &mut config, &mut issues);
        }
        config.ensure_interfaces();
        if let Some(routing) = section.routing.as_ref() {
            read_routing(routing, &mut config, &mut issues);
        }
        if let Some(dns) = section.dns.as_ref() {
            config.dns = read_dns(dns, &mut issues);
        }

        log::info!(
            "Imported {} connections, {} routes from profile with {} issues",
            config.connections.len(),
            config.routing.routes().count(),
            issues.len()
        );
        Ok(ReadResult { config, issues })
    }
}

fn read_udev_rules(
    sections: &[UdevRuleSection],
    issues: &mut Issues,
) -> Vec<UdevRule> {
    let mut ret = Vec::new();
    for (idx, rule) in sections.iter().enumerate() {
        let location = format!("net-udev[{idx}]");
        let (Some(name), Some(key), Some(value)) = (
            rule.name.as_deref(),
            rule.rule.as_deref(),
            rule.value.as_deref(),
        ) else {
            issues.add(location, "Rule requires name, rule and value");
            continue;
        };
        let mechanism = if key.eq_ignore_ascii_case(UDEV_MAC_KEY) {
            RenamingMechanism::Mac
        } else if key.eq_ignore_ascii_case(UDEV_BUSID_KEY) {
            RenamingMechanism::BusId
        } else {
            issues.add(
                location,
                format!(
                    "Unsupported rule {key}, expecting {UDEV_MAC_KEY} or \
                     {UDEV_BUSID_KEY}"
                ),
            );
            continue;
        };
        ret.push(UdevRule::new(name, mechanism, value));
    }
    ret
}

fn read_interface(
    idx: usize,
    section: &InterfaceSection,
    config: &mut NetworkConfig,
    issues: &mut Issues,
) {
    let location = format!("interfaces[{idx}]");
    let name = section.iface_name().trim();
    if name.is_empty() {
        issues.add(location, "Missing device");
        return;
    }
    if config.connections.by_name(name).is_some() {
        issues.add(location, format!("Duplicate device {name}"));
        return;
    }
    let hardware = config
        .interfaces
        .by_name(name)
        .and_then(|i| i.hardware.as_ref());
    let source = SectionTypeSource {
        section,
        hardware_type: hardware.and_then(|h| h.iface_type),
    };
    let Some(iface_type) = detect_type(&source) else {
        issues.add(location, "Unable to determine interface type");
        return;
    };
    let Some(mut conn) = ConnectionConfig::new(iface_type, name) else {
        issues.add(
            location,
            format!("Interface type {iface_type} is not supported"),
        );
        return;
    };
    let file = section_to_file(section);
    load_conn(&file, &mut conn, hardware, &location, issues);
    conn.base_conn_mut().hostnames = section.hostnames.clone();
    log::debug!("Imported connection {name} of type {iface_type}");
    config.connections.add(conn);
}

/// Attach channels to the connection of the device holding them, or to the
/// first connection of same type without channels.
fn read_s390_device(
    idx: usize,
    device: &S390DeviceSection,
    config: &mut NetworkConfig,
    issues: &mut Issues,
) {
    let location = format!("s390-devices[{idx}]");
    let Some(iface_type) = device.iface_type() else {
        issues.add(
            location,
            format!(
                "Unknown S/390 device type {}",
                device.device_type.as_deref().unwrap_or_default()
            ),
        );
        return;
    };
    let channels = match device.chanids.as_deref().map(S390Channels::from_str)
    {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            issues.add(location, e.msg().to_string());
            return;
        }
        None => {
            issues.add(location, "Missing chanids");
            return;
        }
    };
    let Some(id) = s390_target(config, iface_type, &channels) else {
        issues.add(
            location,
            format!(
                "No {iface_type} connection for channels {}",
                channels.to_chanids()
            ),
        );
        return;
    };
    let Some(conn) = config.connections.by_id_mut(id) else {
        return;
    };
    match conn {
        ConnectionConfig::Qeth(c) => {
            c.channels = channels;
            c.port_number = parse_num(
                "portno",
                device.portno.as_deref(),
                &location,
                issues,
            );
            if let Some(layer2) = device.layer2.as_deref() {
                match parse_bool(layer2) {
                    Some(v) => c.layer2 = v,
                    None => issues.add(
                        &location,
                        format!("Invalid layer2 {layer2}: expecting yes or no"),
                    ),
                }
            }
        }
        ConnectionConfig::Ctc(c) => {
            c.channels = channels;
            c.protocol = parse_num(
                "protocol",
                device.protocol.as_deref(),
                &location,
                issues,
            );
        }
        ConnectionConfig::Lcs(c) => {
            c.channels = channels;
            c.protocol = parse_num(
                "protocol",
                device.protocol.as_deref(),
                &location,
                issues,
            );
            c.timeout = parse_num(
                "timeout",
                device.timeout.as_deref(),
                &location,
                issues,
            );
        }
        _ => (),
    }
}

fn parse_num<T>(
    key: &str,
    value: Option<&str>,
    location: &str,
    issues: &mut Issues,
) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value?;
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            issues.add(location, format!("Invalid {key} {value}: {e}"));
            None
        }
    }
}

fn s390_target(
    config: &NetworkConfig,
    iface_type: InterfaceType,
    channels: &S390Channels,
) -> Option<ConnectionId> {
    let by_hardware = config
        .interfaces
        .iter()
        .filter(|i| {
            i.hardware.as_ref().and_then(|h| h.channels.as_ref())
                == Some(channels)
        })
        .find_map(|i| config.connections.by_interface(&i.name))
        .filter(|c| c.iface_type() == iface_type);
    if let Some(conn) = by_hardware {
        return Some(conn.id());
    }
    config
        .connections
        .by_type(iface_type)
        .into_iter()
        .find(|c| match c {
            ConnectionConfig::Qeth(c) => c.channels.is_empty(),
            ConnectionConfig::Ctc(c) => c.channels.is_empty(),
            ConnectionConfig::Lcs(c) => c.channels.is_empty(),
            _ => false,
        })
        .map(|c| c.id())
}

fn read_routing(
    section: &RoutingSection,
    config: &mut NetworkConfig,
    issues: &mut Issues,
) {
    let mut read_flag = |key: &str, value: Option<&str>| -> Option<bool> {
        let value = value?;
        let ret = parse_bool(value);
        if ret.is_none() {
            issues.add(
                "routing",
                format!("Invalid {key} {value}: expecting yes or no"),
            );
        }
        ret
    };
    if let Some(v) = read_flag(
        "ipv4_forward",
        section.ipv4_forward.as_deref().or(section.ip_forward.as_deref()),
    ) {
        config.routing.forward_ipv4 = v;
    }
    if let Some(v) = read_flag("ipv6_forward", section.ipv6_forward.as_deref())
    {
        config.routing.forward_ipv6 = v;
    }

    for (idx, route) in section.routes.iter().enumerate() {
        let location = format!("routing.routes[{idx}]");
        let Some(destination) = route.destination.as_deref() else {
            issues.add(location, "Missing destination");
            continue;
        };
        let column = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNSET)
                .to_string()
        };
        let line = format!(
            "{destination} {} {} {} {}",
            column(&route.gateway),
            column(&route.netmask),
            column(&route.device),
            route.extrapara.as_deref().unwrap_or_default()
        );
        match Route::from_sysconfig_line(&line, None) {
            Ok(Some(r)) => {
                config.routing.add_route(r);
            }
            Ok(None) => issues.add(location, "Missing destination"),
            Err(e) => issues.add(location, e.msg().to_string()),
        }
    }
    config.routing.link(&config.interfaces);
}

fn read_dns(section: &DnsSection, issues: &mut Issues) -> Dns {
    let mut nameservers = Vec::new();
    for server in section.nameservers.iter() {
        if IpAddr::from_str(server).is_ok() {
            nameservers.push(server.to_string());
        } else {
            issues.add("dns", format!("Invalid name server {server}"));
        }
    }
    Dns {
        hostname: section.hostname.clone(),
        nameservers,
        searchlist: section.searchlist.clone(),
        resolv_conf_policy: section.resolv_conf_policy.clone(),
    }
}
