// SPDX-License-Identifier: Apache-2.0

use std::{net::IpAddr, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    ErrorKind, InterfacesCollection, IpAddress, JsonDisplay, SysnetError,
    ip::netmask_to_prefix,
};

const DEFAULT_ROUTE_STR: &str = "default";
const UNSET_STR: &str = "-";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
/// Route destination
pub enum RouteTo {
    #[default]
    Default,
    Address(IpAddress),
}

impl std::fmt::Display for RouteTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "{DEFAULT_ROUTE_STR}"),
            Self::Address(a) => write!(f, "{a}"),
        }
    }
}

impl FromStr for RouteTo {
    type Err = SysnetError;

    fn from_str(s: &str) -> Result<Self, SysnetError> {
        if s.trim() == DEFAULT_ROUTE_STR {
            Ok(Self::Default)
        } else {
            Ok(Self::Address(IpAddress::from_str(s)?))
        }
    }
}

impl From<RouteTo> for String {
    fn from(v: RouteTo) -> Self {
        v.to_string()
    }
}

impl TryFrom<String> for RouteTo {
    type Error = SysnetError;

    fn try_from(v: String) -> Result<Self, SysnetError> {
        Self::from_str(v.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Device constraint of a route
pub enum RouteInterface {
    /// No interface constraint.
    #[default]
    Any,
    /// Interface found in the interfaces collection.
    Linked(String),
    /// Device name not matching any known interface, kept as is.
    Unlinked(String),
}

impl RouteInterface {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Linked(n) | Self::Unlinked(n) => Some(n.as_str()),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Resolve device name against the interfaces collection.
    pub fn link(name: &str, ifaces: &InterfacesCollection) -> Self {
        if ifaces.contains(name) {
            Self::Linked(name.to_string())
        } else {
            Self::Unlinked(name.to_string())
        }
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct Route {
    pub to: RouteTo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    #[serde(default)]
    pub interface: RouteInterface,
    /// Extra parameters passed to `ip route` as is, e.g. `metric 100`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl Route {
    pub fn new(
        to: RouteTo,
        gateway: Option<IpAddr>,
        interface: RouteInterface,
    ) -> Self {
        Self {
            to,
            gateway,
            interface,
            options: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.to == RouteTo::Default
    }

    pub fn iface_name(&self) -> Option<&str> {
        self.interface.name()
    }

    /// Parse one line of sysconfig `routes` or `ifroute-<iface>` file:
    /// `DESTINATION GATEWAY NETMASK DEVICE [OPTIONS...]`.
    ///
    /// Return `Ok(None)` for blank and comment lines. A missing or `-`
    /// device in a per-interface file means that interface.
    pub fn from_sysconfig_line(
        line: &str,
        file_iface: Option<&str>,
    ) -> Result<Option<Self>, SysnetError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut fields = line.split_whitespace();
        let dest = fields.next().unwrap_or(UNSET_STR);
        let gateway = fields.next().and_then(unset_to_none);
        let netmask = fields.next().and_then(unset_to_none);
        let device = fields.next().and_then(unset_to_none);
        let options: Vec<&str> = fields.collect();

        let to = if dest == DEFAULT_ROUTE_STR {
            RouteTo::Default
        } else {
            let mut addr = IpAddress::from_str(dest)?;
            if addr.prefix.is_none() {
                addr = match netmask {
                    Some(mask) if mask.contains('.') => {
                        addr.with_netmask(mask)?
                    }
                    Some(prefix) => {
                        addr.with_prefix(parse_prefix(prefix, line)?)?
                    }
                    // Host route
                    None => addr.with_prefix(if addr.is_ipv4() {
                        32
                    } else {
                        128
                    })?,
                };
            }
            RouteTo::Address(addr)
        };
        let gateway = match gateway {
            Some(g) => Some(IpAddr::from_str(g).map_err(|e| {
                SysnetError::new(
                    ErrorKind::InvalidArgument,
                    format!("Invalid gateway {g} in route '{line}': {e}"),
                )
            })?),
            None => None,
        };
        let interface = match device.or(file_iface) {
            Some(name) => RouteInterface::Unlinked(name.to_string()),
            None => RouteInterface::Any,
        };
        Ok(Some(Self {
            to,
            gateway,
            interface,
            options: if options.is_empty() {
                None
            } else {
                Some(options.join(" "))
            },
        }))
    }

    /// Render as sysconfig route line, destination always in prefix
    /// notation.
    pub fn to_sysconfig_line(&self) -> String {
        let gateway = self
            .gateway
            .map(|g| g.to_string())
            .unwrap_or_else(|| UNSET_STR.to_string());
        let mut ret = format!(
            "{} {gateway} {UNSET_STR} {}",
            self.to,
            self.iface_name().unwrap_or(UNSET_STR)
        );
        if let Some(opts) = self.options.as_deref()
            && !opts.is_empty()
        {
            ret.push(' ');
            ret.push_str(opts);
        }
        ret
    }
}

fn unset_to_none(s: &str) -> Option<&str> {
    if s == UNSET_STR { None } else { Some(s) }
}

fn parse_prefix(prefix: &str, line: &str) -> Result<u8, SysnetError> {
    let prefix = prefix.trim_start_matches('/');
    match prefix.parse::<u8>() {
        Ok(p) => Ok(p),
        Err(_) => netmask_to_prefix(prefix).map_err(|_| {
            SysnetError::new(
                ErrorKind::InvalidArgument,
                format!("Invalid netmask {prefix} in route '{line}'"),
            )
        }),
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Ordered list of routes without duplicates
pub struct RoutingTable {
    #[serde(default)]
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append route, ignored if an equal route exists already.
    /// Return whether route was added.
    pub fn push(&mut self, route: Route) -> bool {
        if self.routes.contains(&route) {
            log::debug!("Ignoring duplicate route {route}");
            false
        } else {
            self.routes.push(route);
            true
        }
    }

    pub fn routes(&self) -> &[Route] {
        self.routes.as_slice()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Route> {
        self.routes.iter_mut()
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Route) -> bool,
    {
        self.routes.retain(f)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Routing tables plus IP forwarding flags
pub struct Routing {
    /// Always hold at least one table, routes are added to the first one.
    pub tables: Vec<RoutingTable>,
    #[serde(default)]
    pub forward_ipv4: bool,
    #[serde(default)]
    pub forward_ipv6: bool,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            tables: vec![RoutingTable::new()],
            forward_ipv4: false,
            forward_ipv6: false,
        }
    }
}

impl Routing {
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.tables.iter().flat_map(|t| t.routes().iter())
    }

    pub fn add_route(&mut self, route: Route) -> bool {
        if self.tables.is_empty() {
            self.tables.push(RoutingTable::new());
        }
        // The check above guarantees a table.
        self.tables
            .first_mut()
            .map(|t| t.push(route))
            .unwrap_or_default()
    }

    /// Routes bound to specified device, stored in `ifroute-<iface>`.
    pub fn iface_routes(&self, iface_name: &str) -> Vec<&Route> {
        self.routes()
            .filter(|r| r.iface_name() == Some(iface_name))
            .collect()
    }

    pub fn remove_iface_routes(&mut self, iface_name: &str) {
        for table in self.tables.iter_mut() {
            table.retain(|r| r.iface_name() != Some(iface_name));
        }
    }

    /// Re-point routes of `old` device to `new`.
    pub(crate) fn rename_iface(&mut self, old: &str, new: &str) {
        for route in self.tables.iter_mut().flat_map(|t| t.iter_mut()) {
            route.interface = match &route.interface {
                RouteInterface::Linked(n) if n == old => {
                    RouteInterface::Linked(new.to_string())
                }
                RouteInterface::Unlinked(n) if n == old => {
                    RouteInterface::Unlinked(new.to_string())
                }
                i => i.clone(),
            };
        }
    }

    /// Resolve each route device against the interfaces collection.
    pub(crate) fn link(&mut self, ifaces: &InterfacesCollection) {
        for route in self.tables.iter_mut().flat_map(|t| t.iter_mut()) {
            if let Some(name) = route.iface_name() {
                route.interface = RouteInterface::link(name, ifaces);
            }
        }
    }
}
