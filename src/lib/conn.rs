// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, BondingConnection, BridgeConnection,
    ConnectionConfigsCollection, ConnectionId, CtcConnection, DummyConnection,
    EthernetConnection, Hardware, InfinibandConnection, InterfaceType,
    JsonDisplayHideSecrets, LcsConnection, LoopbackConnection, ProposeContext,
    QethConnection, SysnetConnection, TunTapConnection, TunTapMode,
    VlanConnection, WirelessConnection,
};

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplayHideSecrets,
)]
#[serde(rename_all = "kebab-case", tag = "type")]
#[non_exhaustive]
/// The configuration a device should use, independent of whether the
/// device currently exists. Stored as sysconfig `ifcfg-<name>` file.
pub enum ConnectionConfig {
    Ethernet(Box<EthernetConnection>),
    Wireless(Box<WirelessConnection>),
    Infiniband(Box<InfinibandConnection>),
    Bonding(Box<BondingConnection>),
    Bridge(Box<BridgeConnection>),
    Vlan(Box<VlanConnection>),
    TunTap(Box<TunTapConnection>),
    Dummy(Box<DummyConnection>),
    Loopback(Box<LoopbackConnection>),
    Qeth(Box<QethConnection>),
    Ctc(Box<CtcConnection>),
    Lcs(Box<LcsConnection>),
}

macro_rules! for_each_conn {
    ($conn:expr, $c:ident => $body:expr) => {
        match $conn {
            ConnectionConfig::Ethernet($c) => $body,
            ConnectionConfig::Wireless($c) => $body,
            ConnectionConfig::Infiniband($c) => $body,
            ConnectionConfig::Bonding($c) => $body,
            ConnectionConfig::Bridge($c) => $body,
            ConnectionConfig::Vlan($c) => $body,
            ConnectionConfig::TunTap($c) => $body,
            ConnectionConfig::Dummy($c) => $body,
            ConnectionConfig::Loopback($c) => $body,
            ConnectionConfig::Qeth($c) => $body,
            ConnectionConfig::Ctc($c) => $body,
            ConnectionConfig::Lcs($c) => $body,
        }
    };
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::Ethernet(Box::default())
    }
}

impl ConnectionConfig {
    /// Create an empty connection of specified type.
    ///
    /// This is the only place mapping [InterfaceType] to connection variant,
    /// adding new connection type means adding one arm here.
    /// Return None for types detected but not managed (e.g. PPP).
    pub fn new(iface_type: InterfaceType, name: &str) -> Option<Self> {
        Some(match iface_type {
            InterfaceType::Ethernet => {
                Self::Ethernet(Box::new(EthernetConnection::new(name)))
            }
            InterfaceType::Wireless => {
                Self::Wireless(Box::new(WirelessConnection::new(name)))
            }
            InterfaceType::Infiniband => {
                Self::Infiniband(Box::new(InfinibandConnection::new(name)))
            }
            InterfaceType::Bonding => {
                Self::Bonding(Box::new(BondingConnection::new(name)))
            }
            InterfaceType::Bridge => {
                Self::Bridge(Box::new(BridgeConnection::new(name)))
            }
            InterfaceType::Vlan => {
                Self::Vlan(Box::new(VlanConnection::new(name)))
            }
            InterfaceType::Tun => Self::TunTap(Box::new(
                TunTapConnection::new(name, TunTapMode::Tun),
            )),
            InterfaceType::Tap => Self::TunTap(Box::new(
                TunTapConnection::new(name, TunTapMode::Tap),
            )),
            InterfaceType::Dummy => {
                Self::Dummy(Box::new(DummyConnection::new(name)))
            }
            InterfaceType::Loopback => {
                Self::Loopback(Box::new(LoopbackConnection::new(name)))
            }
            InterfaceType::Qeth => {
                Self::Qeth(Box::new(QethConnection::new(name)))
            }
            InterfaceType::Ctc => Self::Ctc(Box::new(CtcConnection::new(name))),
            InterfaceType::Lcs => Self::Lcs(Box::new(LcsConnection::new(name))),
            InterfaceType::Ppp => return None,
        })
    }

    pub fn base_conn(&self) -> &BaseConnection {
        for_each_conn!(self, c => c.base_conn())
    }

    pub fn base_conn_mut(&mut self) -> &mut BaseConnection {
        for_each_conn!(self, c => c.base_conn_mut())
    }

    pub fn iface_type(&self) -> InterfaceType {
        for_each_conn!(self, c => c.iface_type())
    }

    pub fn name(&self) -> &str {
        self.base_conn().name.as_str()
    }

    pub fn id(&self) -> ConnectionId {
        self.base_conn().id
    }

    /// Name of the bound interface, falling back to connection name.
    pub fn iface_name(&self) -> &str {
        self.base_conn().iface_name()
    }

    pub fn ports(&self) -> Option<Vec<&str>> {
        for_each_conn!(self, c => c.ports())
    }

    pub fn parent(&self) -> Option<&str> {
        for_each_conn!(self, c => c.parent())
    }

    pub fn is_virtual(&self) -> bool {
        self.iface_type().is_virtual()
    }

    pub fn is_dhcp(&self) -> bool {
        self.base_conn().bootproto.is_dhcp()
    }

    pub fn is_static(&self) -> bool {
        self.base_conn().bootproto.is_static()
    }

    pub fn propose(
        &mut self,
        ctx: &ProposeContext,
        hardware: Option<&Hardware>,
    ) {
        for_each_conn!(self, c => c.propose(ctx, hardware))
    }

    pub fn hide_secrets(&mut self) {
        for_each_conn!(self, c => c.hide_secrets())
    }

    /// Find the bonding or bridge connection holding this connection as
    /// port.
    ///
    /// Linear scan over the collection. Cycles (a controller being a port of
    /// itself or its descendant) are not detected, caller should not create
    /// them.
    pub fn find_parent<'a>(
        &self,
        conns: &'a ConnectionConfigsCollection,
    ) -> Option<&'a ConnectionConfig> {
        let iface_name = self.iface_name();
        conns.iter().find(|c| {
            c.id() != self.id()
                && c.ports()
                    .map(|ports| ports.contains(&iface_name))
                    .unwrap_or_default()
        })
    }

    /// Point every reference to interface `old` at `new`: the bound
    /// interface, bonding slaves, bridge ports and VLAN parent.
    pub(crate) fn replace_iface_refs(&mut self, old: &str, new: &str) {
        let base = self.base_conn_mut();
        if base.interface.as_deref() == Some(old) {
            base.interface = Some(new.to_string());
        }
        let names: Option<&mut Vec<String>> = match self {
            Self::Bonding(c) => Some(&mut c.slaves),
            Self::Bridge(c) => Some(&mut c.ports),
            _ => None,
        };
        if let Some(names) = names {
            for name in names.iter_mut().filter(|n| n.as_str() == old) {
                *name = new.to_string();
            }
        }
        if let Self::Vlan(c) = self
            && c.parent_device.as_deref() == Some(old)
        {
            c.parent_device = Some(new.to_string());
        }
    }
}
