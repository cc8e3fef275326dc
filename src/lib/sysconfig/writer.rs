// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{
    conn_attrs::dump_conn,
    file::{KeyValueFile, KeyValueStyle},
    hosts::HostsFile,
    reader::{
        IFROUTE_PREFIX, KEY_DNS_POLICY, KEY_DNS_SEARCHLIST, KEY_DNS_SERVERS,
        SYSCTL_IPV4_FORWARD, SYSCTL_IPV6_FORWARD, list_dir_files,
    },
    routes_file::render_routes,
};
use crate::{
    JsonDisplay, NetworkConfig, Route, SysnetConfig, SysnetError, UdevRule,
    error::io_error_with_path,
    udev::{parse_udev_rules, render_udev_rules},
};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Files touched by [Writer::write]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl WriteSummary {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.removed.is_empty()
    }
}

/// Persist [NetworkConfig] under [SysnetConfig::root].
///
/// Each concern (connections, routes, forwarding, udev rules, hosts, DNS)
/// is compared against the old snapshot and only rewritten when changed.
/// Files are written one by one, a failure in the middle leaves the
/// previous ones written.
pub struct Writer<'a> {
    conf: &'a SysnetConfig,
}

impl<'a> Writer<'a> {
    pub fn new(conf: &'a SysnetConfig) -> Self {
        Self { conf }
    }

    /// Write `new` comparing with `old` which should be the snapshot
    /// [crate::Reader] produced. When `old` is None, everything in `new` is
    /// written and nothing is removed.
    pub fn write(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
    ) -> Result<WriteSummary, SysnetError> {
        let mut summary = WriteSummary::default();
        self.write_connections(new, old, &mut summary)?;
        self.write_routes(new, old, &mut summary)?;
        self.write_forwarding(new, old, &mut summary)?;
        self.write_udev_rules(new, old, &mut summary)?;
        self.write_hosts(new, old, &mut summary)?;
        self.write_dns(new, old, &mut summary)?;
        if summary.is_empty() {
            log::info!("Nothing changed");
        } else {
            log::info!(
                "Written {} files, removed {} files",
                summary.written.len(),
                summary.removed.len()
            );
        }
        Ok(summary)
    }

    fn write_connections(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        if let Some(old) = old {
            for old_conn in old.connections.iter() {
                let stale = match new.connections.by_id(old_conn.id()) {
                    None => true,
                    Some(c) => c.name() != old_conn.name(),
                };
                if stale && new.connections.by_name(old_conn.name()).is_none() {
                    remove_file(
                        &self.conf.ifcfg_path(old_conn.name()),
                        summary,
                    )?;
                }
            }
        }

        for conn in new.connections.iter() {
            if conn.base_conn().interface.is_none() {
                log::debug!(
                    "Connection {} is not bound to any interface, not saved",
                    conn.name()
                );
                // Unbound since the old snapshot
                if let Some(old_conn) =
                    old.and_then(|o| o.connections.by_id(conn.id()))
                    && old_conn.base_conn().interface.is_some()
                {
                    remove_file(
                        &self.conf.ifcfg_path(old_conn.name()),
                        summary,
                    )?;
                }
                continue;
            }
            if let Some(old_conn) =
                old.and_then(|o| o.connections.by_id(conn.id()))
                && old_conn == conn
            {
                continue;
            }
            let hardware_type = new
                .interfaces
                .by_name(conn.iface_name())
                .and_then(|i| i.hardware.as_ref())
                .and_then(|h| h.iface_type);
            let mut file = KeyValueFile::new(KeyValueStyle::Sysconfig);
            dump_conn(conn, hardware_type, &mut file);
            write_file(
                &self.conf.ifcfg_path(conn.name()),
                &file.render(),
                summary,
            )?;
        }
        Ok(())
    }

    fn write_routes(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        let new_files = route_files(new);
        let old_files = old.map(route_files).unwrap_or_default();

        let mut global_changed = false;
        for (iface, routes) in &new_files {
            if old.is_some() && old_files.get(iface) == Some(routes) {
                continue;
            }
            global_changed |= iface.is_none();
            let path = self.routes_path(iface.as_deref());
            if routes.is_empty() {
                if old.is_some() {
                    remove_file(&path, summary)?;
                }
            } else {
                write_file(&path, &render_routes(routes), summary)?;
            }
        }
        if old.is_none() {
            return Ok(());
        }
        for iface in old_files.keys() {
            if !new_files.contains_key(iface) {
                remove_file(&self.routes_path(iface.as_deref()), summary)?;
            }
        }
        // Routes of `ifroute-*` files without connection were read into the
        // global file, drop those files once it got rewritten.
        if global_changed {
            for (iface, path) in
                list_dir_files(&self.conf.sysconfig_dir(), IFROUTE_PREFIX)?
            {
                if !new_files.contains_key(&Some(iface)) {
                    remove_file(&path, summary)?;
                }
            }
        }
        Ok(())
    }

    fn routes_path(&self, iface: Option<&str>) -> PathBuf {
        match iface {
            Some(i) => self.conf.ifroute_path(i),
            None => self.conf.routes_path(),
        }
    }

    fn write_forwarding(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        if let Some(old) = old
            && old.routing.forward_ipv4 == new.routing.forward_ipv4
            && old.routing.forward_ipv6 == new.routing.forward_ipv6
        {
            return Ok(());
        }
        let path = self.conf.sysctl_path();
        let mut file = KeyValueFile::load(&path, KeyValueStyle::Sysctl)?;
        file.set(SYSCTL_IPV4_FORWARD, bool_to_sysctl(new.routing.forward_ipv4));
        file.set(SYSCTL_IPV6_FORWARD, bool_to_sysctl(new.routing.forward_ipv6));
        write_file(&path, &file.render(), summary)
    }

    fn write_udev_rules(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        let new_rules = udev_rules(new);
        if let Some(old) = old
            && udev_rules(old) == new_rules
        {
            return Ok(());
        }
        let path = self.conf.udev_rules_path();
        let mut rules: Vec<UdevRule> = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| io_error_with_path(e, &path))?;
            // Keep rules of devices not present
            parse_udev_rules(&content)
                .0
                .into_iter()
                .filter(|r| {
                    !new.interfaces.iter().any(|i| r.matches(i))
                        && !new_rules.iter().any(|n| n.name == r.name)
                })
                .collect()
        } else {
            Vec::new()
        };
        rules.extend(new_rules);
        if rules.is_empty() {
            remove_file(&path, summary)
        } else {
            write_file(&path, &render_udev_rules(&rules), summary)
        }
    }

    fn write_hosts(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        let new_entries = host_entries(new);
        let old_entries = old.map(host_entries).unwrap_or_default();
        if old.is_some() && new_entries == old_entries {
            return Ok(());
        }
        let path = self.conf.hosts_path();
        let mut hosts = HostsFile::load(&path)?;
        for address in old_entries.keys() {
            if !new_entries.contains_key(address) {
                hosts.set(address, &[]);
            }
        }
        for (address, names) in &new_entries {
            hosts.set(address, names);
        }
        let content = hosts.render();
        if content.is_empty() && !path.exists() {
            return Ok(());
        }
        write_file(&path, &content, summary)
    }

    fn write_dns(
        &self,
        new: &NetworkConfig,
        old: Option<&NetworkConfig>,
        summary: &mut WriteSummary,
    ) -> Result<(), SysnetError> {
        if let Some(old) = old
            && old.dns == new.dns
        {
            return Ok(());
        }
        let dns = &new.dns;
        if let Some(hostname) = dns.hostname.as_deref() {
            write_file(
                &self.conf.hostname_path(),
                &format!("{hostname}\n"),
                summary,
            )?;
        } else if old.is_some_and(|o| o.dns.hostname.is_some()) {
            remove_file(&self.conf.hostname_path(), summary)?;
        }
        let path = self.conf.network_config_path();
        let mut file = KeyValueFile::load(&path, KeyValueStyle::Sysconfig)?;
        if let Some(policy) = dns.resolv_conf_policy.as_deref() {
            file.set(KEY_DNS_POLICY, policy);
        }
        file.set(KEY_DNS_SERVERS, &dns.nameservers.join(" "));
        file.set(KEY_DNS_SEARCHLIST, &dns.searchlist.join(" "));
        write_file(&path, &file.render(), summary)
    }
}

/// Routes grouped by target file, None key is the global `routes` file.
///
/// Routes of devices without connection go to the global file keeping the
/// device column.
fn route_files(
    config: &NetworkConfig,
) -> BTreeMap<Option<String>, Vec<&Route>> {
    let mut ret: BTreeMap<Option<String>, Vec<&Route>> = BTreeMap::new();
    ret.insert(None, Vec::new());
    for route in config.routing.routes() {
        let key = route
            .iface_name()
            .filter(|name| config.connections.by_interface(name).is_some())
            .map(|name| name.to_string());
        ret.entry(key).or_default().push(route);
    }
    ret
}

fn udev_rules(config: &NetworkConfig) -> Vec<UdevRule> {
    config
        .interfaces
        .physical()
        .into_iter()
        .filter_map(UdevRule::for_interface)
        .collect()
}

/// Address to host names of static connections.
fn host_entries(config: &NetworkConfig) -> BTreeMap<String, Vec<String>> {
    let mut ret = BTreeMap::new();
    for conn in config.connections.iter().filter(|c| c.is_static()) {
        let base = conn.base_conn();
        if let Some(ip) = base.ip.as_ref()
            && !base.hostnames.is_empty()
        {
            ret.insert(ip.address.address_str(), base.hostnames.clone());
        }
    }
    ret
}

fn bool_to_sysctl(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

/// Write file unless it already holds the same content.
fn write_file(
    path: &Path,
    content: &str,
    summary: &mut WriteSummary,
) -> Result<(), SysnetError> {
    if path.exists()
        && std::fs::read_to_string(path)
            .map(|c| c == content)
            .unwrap_or_default()
    {
        log::debug!("{} is already up to date", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error_with_path(e, parent))?;
    }
    log::info!("Writing {}", path.display());
    std::fs::write(path, content).map_err(|e| io_error_with_path(e, path))?;
    summary.written.push(path.to_path_buf());
    Ok(())
}

fn remove_file(
    path: &Path,
    summary: &mut WriteSummary,
) -> Result<(), SysnetError> {
    if !path.exists() {
        return Ok(());
    }
    log::info!("Removing {}", path.display());
    std::fs::remove_file(path).map_err(|e| io_error_with_path(e, path))?;
    summary.removed.push(path.to_path_buf());
    Ok(())
}
