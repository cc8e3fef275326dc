// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    BootProtocol, Hardware, InterfaceType, IpConfig, JsonDisplay,
    ProposeContext, Startmode,
};

/// Stable identity of a connection.
///
/// Assigned once by [crate::ConnectionConfigsCollection] and never changed
/// by renaming, so the same connection can be found in two snapshots even
/// when its name or interface changed. Zero means not assigned yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    Serialize, Deserialize,
)]
pub struct ConnectionId(pub(crate) u64);

impl ConnectionId {
    pub const UNASSIGNED: Self = Self(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, Default, Serialize, Deserialize, JsonDisplay)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Information shared among all connection types
pub struct BaseConnection {
    #[serde(skip)]
    pub(crate) id: ConnectionId,
    /// Connection name, also the name of sysconfig `ifcfg-<name>` file.
    pub name: String,
    /// Device this connection applies to. None means not bound yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default)]
    pub bootproto: BootProtocol,
    /// None means leave the sysconfig default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startmode: Option<Startmode>,
    /// Primary address, sysconfig `IPADDR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpConfig>,
    /// Additional addresses in their configured order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_aliases: Vec<IpConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethtool_options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_zone: Option<String>,
    /// Host names of the primary static address, first one is canonical.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
    /// Human readable description, sysconfig `NAME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Overriding MAC address, sysconfig `LLADDR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lladdress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhclient_set_hostname: Option<bool>,
}

// The `id` is identity, not value.
impl PartialEq for BaseConnection {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.interface == other.interface
            && self.bootproto == other.bootproto
            && self.startmode == other.startmode
            && self.ip == other.ip
            && self.ip_aliases == other.ip_aliases
            && self.mtu == other.mtu
            && self.ethtool_options == other.ethtool_options
            && self.firewall_zone == other.firewall_zone
            && self.hostnames == other.hostnames
            && self.description == other.description
            && self.lladdress == other.lladdress
            && self.dhclient_set_hostname == other.dhclient_set_hostname
    }
}

impl BaseConnection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            interface: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Name of the bound interface, falling back to connection name.
    pub fn iface_name(&self) -> &str {
        self.interface.as_deref().unwrap_or(self.name.as_str())
    }

    /// All addresses: primary first, then aliases.
    pub fn all_ips(&self) -> impl Iterator<Item = &IpConfig> {
        self.ip.iter().chain(self.ip_aliases.iter())
    }

    pub(crate) fn propose(
        &mut self,
        ctx: &ProposeContext,
        iface_type: InterfaceType,
        hardware: Option<&Hardware>,
    ) {
        let startmode = propose_startmode(ctx, iface_type, hardware);
        log::debug!(
            "Proposing start mode {startmode} for connection {}",
            self.name
        );
        self.startmode = Some(startmode);
    }
}

fn propose_startmode(
    ctx: &ProposeContext,
    iface_type: InterfaceType,
    hardware: Option<&Hardware>,
) -> Startmode {
    if ctx.root_on_network {
        return Startmode::Nfsroot;
    }
    match ctx.default_startmode {
        Startmode::Ifplugd { .. } if iface_type.is_virtual() || !ctx.laptop => {
            if hardware.map(|h| h.hotplug) == Some(true) {
                Startmode::Hotplug
            } else {
                Startmode::Auto
            }
        }
        mode => mode,
    }
}
