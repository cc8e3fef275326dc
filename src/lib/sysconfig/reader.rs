// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    conn_attrs::{IfcfgTypeSource, load_conn},
    file::{KeyValueFile, KeyValueStyle},
    hosts::HostsFile,
    routes_file::read_routes_file,
};
use crate::{
    ConnectionConfig, Dns, HardwareProbe, Interface, Issues, JsonDisplay,
    NetworkConfig, SysnetConfig, SysnetError, UdevRule, detect_type,
    error::io_error_with_path, udev::parse_udev_rules,
};

const IFCFG_PREFIX: &str = "ifcfg-";
pub(crate) const IFROUTE_PREFIX: &str = "ifroute-";
const BACKUP_SUFFIXES: [&str; 8] = [
    "~", ".bak", ".orig", ".rpmnew", ".rpmsave", ".old", ".save", ".scpmbackup",
];

pub(crate) const SYSCTL_IPV4_FORWARD: &str = "net.ipv4.ip_forward";
pub(crate) const SYSCTL_IPV6_FORWARD: &str = "net.ipv6.conf.all.forwarding";
pub(crate) const KEY_DNS_POLICY: &str = "NETCONFIG_DNS_POLICY";
pub(crate) const KEY_DNS_SERVERS: &str = "NETCONFIG_DNS_STATIC_SERVERS";
pub(crate) const KEY_DNS_SEARCHLIST: &str = "NETCONFIG_DNS_STATIC_SEARCHLIST";

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Configuration read plus the problems found on the way
pub struct ReadResult {
    pub config: NetworkConfig,
    pub issues: Issues,
}

/// Build [NetworkConfig] from files under [SysnetConfig::root].
///
/// Best effort: a file which cannot be understood is skipped and reported
/// in [ReadResult::issues], only failing to list or read files is an error.
pub struct Reader<'a> {
    conf: &'a SysnetConfig,
    probe: &'a dyn HardwareProbe,
}

impl<'a> Reader<'a> {
    pub fn new(conf: &'a SysnetConfig, probe: &'a dyn HardwareProbe) -> Self {
        Self { conf, probe }
    }

    pub fn read(&self) -> Result<ReadResult, SysnetError> {
        let mut config = NetworkConfig::new();
        let mut issues = Issues::new();

        self.read_hardware(&mut config, &mut issues)?;
        self.read_udev_rules(&mut config, &mut issues)?;
        self.read_connections(&mut config, &mut issues)?;
        config.ensure_interfaces();
        self.read_hosts(&mut config)?;
        self.read_routes(&mut config, &mut issues)?;
        self.read_forwarding(&mut config)?;
        config.dns = self.read_dns()?;

        log::info!(
            "Read {} interfaces, {} connections, {} routes with {} issues",
            config.interfaces.len(),
            config.connections.len(),
            config.routing.routes().count(),
            issues.len()
        );
        Ok(ReadResult { config, issues })
    }

    fn read_hardware(
        &self,
        config: &mut NetworkConfig,
        issues: &mut Issues,
    ) -> Result<(), SysnetError> {
        for hw in self.probe.probe()? {
            log::debug!("Found hardware {hw}");
            if let Err(e) = config.interfaces.push(Interface::new_physical(hw))
            {
                issues.add("hardware", e.msg().to_string());
            }
        }
        Ok(())
    }

    fn read_udev_rules(
        &self,
        config: &mut NetworkConfig,
        issues: &mut Issues,
    ) -> Result<(), SysnetError> {
        let path = self.conf.udev_rules_path();
        if !path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| io_error_with_path(e, &path))?;
        let (rules, errors) = parse_udev_rules(&content);
        for e in errors {
            issues.add(path.display().to_string(), e.msg().to_string());
        }
        apply_udev_rules(config, &rules);
        Ok(())
    }

    fn read_connections(
        &self,
        config: &mut NetworkConfig,
        issues: &mut Issues,
    ) -> Result<(), SysnetError> {
        for (name, path) in
            list_dir_files(&self.conf.sysconfig_dir(), IFCFG_PREFIX)?
        {
            let location = format!("{IFCFG_PREFIX}{name}");
            let file = KeyValueFile::load(&path, KeyValueStyle::Sysconfig)?;
            let hardware = config
                .interfaces
                .by_name(&name)
                .and_then(|i| i.hardware.as_ref());
            let source = IfcfgTypeSource {
                name: &name,
                file: &file,
                hardware_type: hardware.and_then(|h| h.iface_type),
            };
            let Some(iface_type) = detect_type(&source) else {
                issues.add(location, "Unable to determine interface type");
                continue;
            };
            let Some(mut conn) = ConnectionConfig::new(iface_type, &name) else {
                issues.add(
                    location,
                    format!("Interface type {iface_type} is not supported"),
                );
                continue;
            };
            load_conn(&file, &mut conn, hardware, &location, issues);
            log::debug!("Read connection {name} of type {iface_type}");
            config.connections.add(conn);
        }
        Ok(())
    }

    /// Host names of static primary addresses.
    fn read_hosts(
        &self,
        config: &mut NetworkConfig,
    ) -> Result<(), SysnetError> {
        let hosts = HostsFile::load(&self.conf.hosts_path())?;
        for conn in config.connections.iter_mut() {
            if !conn.is_static() {
                continue;
            }
            let base = conn.base_conn_mut();
            if let Some(ip) = base.ip.as_ref() {
                base.hostnames = hosts.names(&ip.address.address_str());
            }
        }
        Ok(())
    }

    fn read_routes(
        &self,
        config: &mut NetworkConfig,
        issues: &mut Issues,
    ) -> Result<(), SysnetError> {
        let mut routes =
            read_routes_file(&self.conf.routes_path(), None, issues)?;
        for (iface_name, path) in
            list_dir_files(&self.conf.sysconfig_dir(), IFROUTE_PREFIX)?
        {
            routes.extend(read_routes_file(&path, Some(&iface_name), issues)?);
        }
        for route in routes {
            config.routing.add_route(route);
        }
        config.routing.link(&config.interfaces);
        Ok(())
    }

    fn read_forwarding(
        &self,
        config: &mut NetworkConfig,
    ) -> Result<(), SysnetError> {
        let file = KeyValueFile::load(
            &self.conf.sysctl_path(),
            KeyValueStyle::Sysctl,
        )?;
        config.routing.forward_ipv4 =
            file.get(SYSCTL_IPV4_FORWARD) == Some("1");
        config.routing.forward_ipv6 =
            file.get(SYSCTL_IPV6_FORWARD) == Some("1");
        Ok(())
    }

    fn read_dns(&self) -> Result<Dns, SysnetError> {
        let file = KeyValueFile::load(
            &self.conf.network_config_path(),
            KeyValueStyle::Sysconfig,
        )?;
        let split = |key: &str| -> Vec<String> {
            file.get(key)
                .map(|v| v.split_whitespace().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        };
        let hostname_path = self.conf.hostname_path();
        let hostname = if hostname_path.exists() {
            std::fs::read_to_string(&hostname_path)
                .map_err(|e| io_error_with_path(e, &hostname_path))?
                .lines()
                .map(|l| l.trim())
                .find(|l| !l.is_empty() && !l.starts_with('#'))
                .map(|l| l.to_string())
        } else {
            None
        };
        Ok(Dns {
            hostname,
            nameservers: split(KEY_DNS_SERVERS),
            searchlist: split(KEY_DNS_SEARCHLIST),
            resolv_conf_policy: file.get(KEY_DNS_POLICY).map(|v| v.to_string()),
        })
    }
}

/// Rename probed interfaces after the udev rules matching their hardware.
pub(crate) fn apply_udev_rules(config: &mut NetworkConfig, rules: &[UdevRule]) {
    for rule in rules {
        let Some(iface) = config.interfaces.iter_mut().find(|i| rule.matches(i))
        else {
            log::debug!("No device matching udev rule {rule}");
            continue;
        };
        if iface.name != rule.name {
            log::info!(
                "Device {} is pinned to name {} by udev rule",
                iface.name,
                rule.name
            );
            iface.old_name = Some(iface.name.clone());
            iface.name = rule.name.clone();
        }
        iface.renaming_mechanism = rule.mechanism();
    }
}

/// Sorted `(suffix, path)` of files named `<prefix><suffix>`, backup
/// copies are skipped.
pub(crate) fn list_dir_files(
    dir: &Path,
    prefix: &str,
) -> Result<Vec<(String, std::path::PathBuf)>, SysnetError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut ret = Vec::new();
    for entry in
        std::fs::read_dir(dir).map_err(|e| io_error_with_path(e, dir))?
    {
        let entry = entry.map_err(|e| io_error_with_path(e, dir))?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(suffix) = file_name.strip_prefix(prefix) else {
            continue;
        };
        if suffix.is_empty()
            || BACKUP_SUFFIXES.iter().any(|b| suffix.ends_with(b))
        {
            log::debug!("Ignoring {file_name}");
            continue;
        }
        if entry.path().is_file() {
            ret.push((suffix.to_string(), entry.path()));
        }
    }
    ret.sort_unstable();
    Ok(ret)
}
