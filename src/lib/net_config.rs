// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    ConnectionConfig, ConnectionConfigsCollection, ConnectionId, Dns,
    ErrorKind, Interface, InterfacesCollection, JsonDisplayHideSecrets,
    RenamingMechanism, Routing, SysnetError, ifaces::iface_name_prefix,
};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonDisplayHideSecrets,
)]
#[serde(rename_all = "kebab-case", default)]
#[non_exhaustive]
/// Complete persistent network configuration of a host
pub struct NetworkConfig {
    pub interfaces: InterfacesCollection,
    pub connections: ConnectionConfigsCollection,
    pub routing: Routing,
    pub dns: Dns,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_secrets(&mut self) {
        for conn in self.connections.iter_mut() {
            conn.hide_secrets();
        }
    }

    /// Add connection and create its interface when not known yet.
    pub fn add_connection(&mut self, conn: ConnectionConfig) -> ConnectionId {
        let id = self.connections.add(conn);
        self.ensure_interfaces();
        id
    }

    /// Remove connection, the virtual interface it defines and routes of
    /// that interface.
    pub fn delete_connection(
        &mut self,
        id: ConnectionId,
    ) -> Option<ConnectionConfig> {
        let conn = self.connections.remove_by_id(id)?;
        let iface_name = conn.iface_name().to_string();
        if self
            .interfaces
            .by_name(&iface_name)
            .map(|i| i.connection == Some(id))
            .unwrap_or_default()
        {
            self.interfaces.remove(&iface_name);
            self.routing.remove_iface_routes(&iface_name);
        }
        Some(conn)
    }

    /// Create interface for connections referring unknown device: virtual
    /// interface for virtual types, physical interface without hardware
    /// for others (e.g. S/390 device not activated yet).
    pub(crate) fn ensure_interfaces(&mut self) {
        for conn in self.connections.iter() {
            let Some(iface_name) = conn.base_conn().interface.as_deref()
            else {
                continue;
            };
            if let Some(iface) = self.interfaces.by_name_mut(iface_name) {
                if conn.is_virtual() && iface.connection.is_none() {
                    iface.connection = Some(conn.id());
                }
                continue;
            }
            let iface = if conn.is_virtual() {
                Interface::new_virtual(iface_name, conn.iface_type(), conn.id())
            } else {
                Interface::new_unprobed(iface_name, conn.iface_type())
            };
            log::debug!(
                "Creating {} interface {iface_name} for connection {}",
                iface.kind,
                conn.name()
            );
            // Existence checked above.
            if let Err(e) = self.interfaces.push(iface) {
                log::error!("BUG: {e}");
            }
        }
    }

    /// Rename interface `old` to `new` pinned by specified mechanism.
    ///
    /// When `new` is used by another interface, that interface is renamed
    /// first to the lowest unused name with the same prefix, e.g. `eth0`
    /// becomes `eth2` when `eth0` and `eth1` exist. Connections, bonding
    /// slaves, bridge ports, VLAN parents and routes are updated.
    pub fn rename_interface(
        &mut self,
        old: &str,
        new: &str,
        mechanism: RenamingMechanism,
    ) -> Result<(), SysnetError> {
        let Some(iface) = self.interfaces.by_name(old) else {
            return Err(SysnetError::new(
                ErrorKind::NotFound,
                format!("Interface {old} not found"),
            ));
        };
        let mechanism = if iface.is_virtual() {
            RenamingMechanism::None
        } else {
            mechanism
        };
        if old == new {
            if let Some(iface) = self.interfaces.by_name_mut(old) {
                iface.renaming_mechanism = mechanism;
            }
            return Ok(());
        }

        if let Some(colliding) = self.interfaces.by_name(new) {
            let colliding_mechanism =
                match colliding.renaming_mechanism {
                    RenamingMechanism::None => mechanism,
                    m => m,
                };
            let fresh = self.interfaces.free_name(iface_name_prefix(new));
            log::info!(
                "Interface name {new} is in use, renaming that interface to \
                 {fresh} first"
            );
            self.rename_interface(new, &fresh, colliding_mechanism)?;
        }

        log::info!("Renaming interface {old} to {new} by {mechanism}");
        if let Some(iface) = self.interfaces.by_name_mut(old) {
            if iface.old_name.is_none() {
                iface.old_name = Some(old.to_string());
            }
            iface.name = new.to_string();
            iface.renaming_mechanism = mechanism;
        }
        for conn in self.connections.iter_mut() {
            conn.replace_iface_refs(old, new);
            if conn.name() == old {
                conn.base_conn_mut().name = new.to_string();
            }
        }
        self.routing.rename_iface(old, new);
        Ok(())
    }

    /// Names of bonding ports pinned by MAC address.
    ///
    /// Bonding sets the same MAC address on all its ports, hence udev rules
    /// matching `ATTR{address}` cannot tell them apart.
    pub fn bond_ports_using_mac_renaming(&self) -> Vec<&str> {
        let mut ret = Vec::new();
        for bond in self.connections.bonding() {
            for port in bond.ports().unwrap_or_default() {
                if let Some(iface) = self.interfaces.by_name(port)
                    && iface.renaming_mechanism == RenamingMechanism::Mac
                    && !ret.contains(&iface.name.as_str())
                {
                    ret.push(iface.name.as_str());
                }
            }
        }
        ret
    }

    /// Switch bonding ports from MAC address to bus ID renaming.
    /// Return names of interfaces changed, ports without known bus ID are
    /// left untouched.
    pub fn fix_bond_ports_renaming(&mut self) -> Vec<String> {
        let names: Vec<String> = self
            .bond_ports_using_mac_renaming()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        let mut ret = Vec::new();
        for name in names {
            let Some(iface) = self.interfaces.by_name_mut(&name) else {
                continue;
            };
            if iface.busid().is_some() {
                log::info!(
                    "Bonding port {name} switched to bus ID based renaming"
                );
                iface.renaming_mechanism = RenamingMechanism::BusId;
                ret.push(name);
            } else {
                log::warn!(
                    "Bonding port {name} is renamed by MAC address but its \
                     bus ID is unknown"
                );
            }
        }
        ret
    }
}
