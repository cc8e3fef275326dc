// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    BaseConnection, ConnectionId, Hardware, InterfaceType, ProposeContext,
};

/// Trait implemented by all type of connections.
pub trait SysnetConnection:
    std::fmt::Debug + for<'a> Deserialize<'a> + Serialize + Default + Clone
{
    fn base_conn(&self) -> &BaseConnection;

    fn base_conn_mut(&mut self) -> &mut BaseConnection;

    /// Interface type derived from the connection variant, never stored.
    fn iface_type(&self) -> InterfaceType;

    fn name(&self) -> &str {
        self.base_conn().name.as_str()
    }

    fn id(&self) -> ConnectionId {
        self.base_conn().id
    }

    /// Return a list of port names. None means this connection cannot hold
    /// ports.
    fn ports(&self) -> Option<Vec<&str>> {
        None
    }

    /// Return parent interface name, None means no parent.
    fn parent(&self) -> Option<&str> {
        None
    }

    /// Fill in defaults depending on the environment.
    /// Will invoke `propose_conn_specific()` at the end.
    /// Please do not override this function but implement
    /// `propose_conn_specific()` instead.
    fn propose(&mut self, ctx: &ProposeContext, hardware: Option<&Hardware>) {
        let iface_type = self.iface_type();
        self.base_conn_mut().propose(ctx, iface_type, hardware);
        self.propose_conn_specific();
    }

    fn propose_conn_specific(&mut self) {}

    /// Replace passwords and keys with placeholder.
    fn hide_secrets(&mut self) {}

    fn from_base(base: BaseConnection) -> Self {
        let mut new = Self::default();
        *new.base_conn_mut() = base;
        new
    }
}
