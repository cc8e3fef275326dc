// SPDX-License-Identifier: Apache-2.0

//! Persistent network configuration of sysconfig based Linux systems.
//!
//! [Reader] loads `ifcfg-*`, route files, udev naming rules and DNS policy
//! into a [NetworkConfig], [Writer] stores an edited copy back touching only
//! the files which changed. [ProfileReader] and [export] translate the same
//! model from and to the `networking` section of an installation profile.

mod boot_proto;
mod config;
mod conn;
mod conn_trait;
mod conns;
mod dns;
mod error;
mod hardware;
mod iface;
mod iface_type;
mod ifaces;
mod ip;
mod issues;
mod net_config;
mod profile;
mod route;
mod startmode;
mod sysconfig;
mod type_detector;
mod udev;

#[cfg(test)]
mod unit_tests;

pub use self::boot_proto::BootProtocol;
pub use self::config::{ProposeContext, SysnetConfig};
pub use self::conn::ConnectionConfig;
pub use self::conn_trait::SysnetConnection;
pub use self::conns::{
    BaseConnection, BondingConnection, BridgeConnection,
    ConnectionConfigsCollection, ConnectionId, CtcConnection, DummyConnection,
    EthernetConnection, InfinibandConnection, InfinibandMode, LcsConnection,
    LoopbackConnection, QethConnection, S390Channels, TunTapConnection,
    TunTapMode, VlanConnection, WirelessAuthMode, WirelessConnection,
};
pub use self::dns::{DEFAULT_RESOLV_CONF_POLICY, Dns};
pub use self::error::{ErrorKind, SysnetError};
pub use self::hardware::{Hardware, HardwareProbe, StaticHardware};
pub use self::iface::{Interface, InterfaceKind, RenamingMechanism};
pub use self::iface_type::InterfaceType;
pub use self::ifaces::InterfacesCollection;
pub use self::ip::{AddrSuffix, IpAddress, IpConfig, PrefixNotation};
pub use self::issues::{Issue, Issues};
pub use self::net_config::NetworkConfig;
pub use self::profile::{
    AliasSection, DnsSection, InterfaceSection, NetworkingSection,
    ProfileReader, RouteSection, RoutingSection, S390DeviceSection,
    UdevRuleSection, export,
};
pub use self::route::{Route, RouteInterface, RouteTo, Routing, RoutingTable};
pub use self::startmode::Startmode;
pub use self::sysconfig::{
    ReadResult, Reader, WriteSummary, Writer, merge_files,
};
pub use self::type_detector::{TypeSource, detect_type};
pub use self::udev::UdevRule;

pub use sysnet_derive::{JsonDisplay, JsonDisplayHideSecrets};
