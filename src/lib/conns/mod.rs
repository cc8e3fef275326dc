// SPDX-License-Identifier: Apache-2.0

mod base;
mod bonding;
mod bridge;
mod collection;
mod dummy;
mod ethernet;
mod infiniband;
mod loopback;
mod s390;
mod tuntap;
mod vlan;
mod wireless;

pub use self::base::{BaseConnection, ConnectionId};
pub use self::bonding::BondingConnection;
pub use self::bridge::BridgeConnection;
pub use self::collection::ConnectionConfigsCollection;
pub use self::dummy::DummyConnection;
pub use self::ethernet::EthernetConnection;
pub use self::infiniband::{InfinibandConnection, InfinibandMode};
pub use self::loopback::LoopbackConnection;
pub use self::s390::{
    CtcConnection, LcsConnection, QethConnection, S390Channels,
};
pub use self::tuntap::{TunTapConnection, TunTapMode};
pub use self::vlan::VlanConnection;
pub use self::wireless::{WirelessAuthMode, WirelessConnection};

pub(crate) use self::wireless::{HIDE_PASSWORD_STR, MAX_WEP_KEYS};
