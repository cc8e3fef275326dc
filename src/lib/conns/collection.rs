// SPDX-License-Identifier: Apache-2.0

use serde::{
    Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq,
};

use crate::{ConnectionConfig, ConnectionId, InterfaceType};

/// Monotonic source of [ConnectionId], owned by the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdGenerator {
    last: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            last: ConnectionId::UNASSIGNED.0,
        }
    }
}

impl IdGenerator {
    fn next_id(&mut self) -> ConnectionId {
        self.last += 1;
        ConnectionId(self.last)
    }

    /// Never hand out an id lower than or equal to one already in use.
    fn observe(&mut self, id: ConnectionId) {
        if id.0 > self.last {
            self.last = id.0;
        }
    }
}

/// Ordered list of [ConnectionConfig] keyed by [ConnectionId].
///
/// Cloning the collection keeps every id, so a cloned snapshot can be edited
/// and handed to [crate::Writer] together with the original.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct ConnectionConfigsCollection {
    conns: Vec<ConnectionConfig>,
    id_gen: IdGenerator,
}

// Two collections are equal when holding the same connections in the same
// order, the id counter is not part of it.
impl PartialEq for ConnectionConfigsCollection {
    fn eq(&self, other: &Self) -> bool {
        self.conns == other.conns
    }
}

impl Eq for ConnectionConfigsCollection {}

impl<'de> Deserialize<'de> for ConnectionConfigsCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut ret = Self::default();
        for conn in
            <Vec<ConnectionConfig> as Deserialize>::deserialize(deserializer)?
        {
            ret.add(conn);
        }
        Ok(ret)
    }
}

impl Serialize for ConnectionConfigsCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.conns.len()))?;
        for conn in &self.conns {
            seq.serialize_element(conn)?;
        }
        seq.end()
    }
}

impl ConnectionConfigsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionConfig> {
        self.conns.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ConnectionConfig> {
        self.conns.iter_mut()
    }

    /// Append connection and return its id. Unassigned id will be
    /// generated, an existing id is kept.
    pub fn add(&mut self, mut conn: ConnectionConfig) -> ConnectionId {
        let id = if conn.id().is_assigned() {
            self.id_gen.observe(conn.id());
            conn.id()
        } else {
            let id = self.id_gen.next_id();
            conn.base_conn_mut().id = id;
            id
        };
        log::debug!("Adding connection {} with id {id}", conn.name());
        self.conns.push(conn);
        id
    }

    /// Replace the connection holding the same id, or append it when not
    /// found.
    pub fn add_or_update(&mut self, conn: ConnectionConfig) -> ConnectionId {
        if conn.id().is_assigned()
            && let Some(cur) = self.by_id_mut(conn.id())
        {
            let id = conn.id();
            *cur = conn;
            return id;
        }
        self.add(conn)
    }

    pub fn by_id(&self, id: ConnectionId) -> Option<&ConnectionConfig> {
        self.conns.iter().find(|c| c.id() == id)
    }

    pub fn by_id_mut(
        &mut self,
        id: ConnectionId,
    ) -> Option<&mut ConnectionConfig> {
        self.conns.iter_mut().find(|c| c.id() == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ConnectionConfig> {
        self.conns.iter().find(|c| c.name() == name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut ConnectionConfig> {
        self.conns.iter_mut().find(|c| c.name() == name)
    }

    /// First connection bound to specified interface.
    pub fn by_interface(&self, iface_name: &str) -> Option<&ConnectionConfig> {
        self.conns
            .iter()
            .find(|c| c.base_conn().interface.as_deref() == Some(iface_name))
    }

    pub fn remove_by_id(
        &mut self,
        id: ConnectionId,
    ) -> Option<ConnectionConfig> {
        let pos = self.conns.iter().position(|c| c.id() == id)?;
        Some(self.conns.remove(pos))
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<ConnectionConfig> {
        let pos = self.conns.iter().position(|c| c.name() == name)?;
        Some(self.conns.remove(pos))
    }

    pub fn select<F>(&self, pred: F) -> Vec<&ConnectionConfig>
    where
        F: Fn(&ConnectionConfig) -> bool,
    {
        self.conns.iter().filter(|c| pred(c)).collect()
    }

    pub fn by_type(&self, iface_type: InterfaceType) -> Vec<&ConnectionConfig> {
        self.select(|c| c.iface_type() == iface_type)
    }

    pub fn bonding(&self) -> Vec<&ConnectionConfig> {
        self.by_type(InterfaceType::Bonding)
    }

    pub fn bridges(&self) -> Vec<&ConnectionConfig> {
        self.by_type(InterfaceType::Bridge)
    }

    pub fn vlans(&self) -> Vec<&ConnectionConfig> {
        self.by_type(InterfaceType::Vlan)
    }
}
