// SPDX-License-Identifier: Apache-2.0

use super::{
    attrs::section_from_file,
    section::{
        DnsSection, InterfaceSection, NetworkingSection, RouteSection,
        RoutingSection, S390DeviceSection, UdevRuleSection,
    },
};
use crate::{
    ConnectionConfig, NetworkConfig, S390Channels, UdevRule,
    sysconfig::{KeyValueFile, KeyValueStyle, dump_conn},
};

fn yes_no(v: bool) -> String {
    if v { "yes" } else { "no" }.to_string()
}

/// Express [NetworkConfig] as the `networking` section of an installation
/// profile. Importing the result with [crate::ProfileReader] on the same
/// hardware gives back the same configuration.
pub fn export(config: &NetworkConfig) -> NetworkingSection {
    let mut ret = NetworkingSection {
        interfaces: config
            .connections
            .iter()
            .filter(|c| c.base_conn().interface.is_some())
            .map(|c| export_conn(config, c))
            .collect(),
        s390_devices: config
            .connections
            .iter()
            .filter_map(export_s390_device)
            .collect(),
        net_udev: config
            .interfaces
            .physical()
            .into_iter()
            .filter_map(UdevRule::for_interface)
            .map(|r| UdevRuleSection {
                name: Some(r.name),
                rule: Some(r.rule),
                value: Some(r.value),
            })
            .collect(),
        ..Default::default()
    };

    let routing = &config.routing;
    if routing.forward_ipv4
        || routing.forward_ipv6
        || routing.routes().next().is_some()
    {
        ret.routing = Some(RoutingSection {
            ipv4_forward: Some(yes_no(routing.forward_ipv4)),
            ipv6_forward: Some(yes_no(routing.forward_ipv6)),
            ip_forward: None,
            routes: routing
                .routes()
                .map(|r| RouteSection {
                    destination: Some(r.to.to_string()),
                    gateway: r.gateway.map(|g| g.to_string()),
                    netmask: None,
                    device: r.iface_name().map(|n| n.to_string()),
                    extrapara: r.options.clone(),
                })
                .collect(),
        });
    }

    if !config.dns.is_empty() {
        ret.dns = Some(DnsSection {
            hostname: config.dns.hostname.clone(),
            nameservers: config.dns.nameservers.clone(),
            searchlist: config.dns.searchlist.clone(),
            resolv_conf_policy: config.dns.resolv_conf_policy.clone(),
        });
    }
    log::debug!(
        "Exported {} interfaces, {} s390 devices, {} udev rules",
        ret.interfaces.len(),
        ret.s390_devices.len(),
        ret.net_udev.len()
    );
    ret
}

fn export_conn(
    config: &NetworkConfig,
    conn: &ConnectionConfig,
) -> InterfaceSection {
    let hardware_type = config
        .interfaces
        .by_name(conn.iface_name())
        .and_then(|i| i.hardware.as_ref())
        .and_then(|h| h.iface_type);
    let mut file = KeyValueFile::new(KeyValueStyle::Sysconfig);
    dump_conn(conn, hardware_type, &mut file);
    let mut section = section_from_file(&file);
    section.device = Some(conn.name().to_string());
    section.hostnames = conn.base_conn().hostnames.clone();
    section
}

fn export_s390_device(conn: &ConnectionConfig) -> Option<S390DeviceSection> {
    let channels = |c: &S390Channels| {
        if c.is_empty() {
            None
        } else {
            Some(c.to_chanids())
        }
    };
    let mut ret = S390DeviceSection {
        device_type: Some(conn.iface_type().short_name().to_string()),
        ..Default::default()
    };
    match conn {
        ConnectionConfig::Qeth(c) => {
            ret.chanids = channels(&c.channels);
            ret.layer2 = Some(yes_no(c.layer2));
            ret.portno = c.port_number.map(|p| p.to_string());
        }
        ConnectionConfig::Ctc(c) => {
            ret.chanids = channels(&c.channels);
            ret.protocol = c.protocol.map(|p| p.to_string());
        }
        ConnectionConfig::Lcs(c) => {
            ret.chanids = channels(&c.channels);
            ret.protocol = c.protocol.map(|p| p.to_string());
            ret.timeout = c.timeout.map(|t| t.to_string());
        }
        _ => return None,
    }
    ret.chanids.is_some().then_some(ret)
}
