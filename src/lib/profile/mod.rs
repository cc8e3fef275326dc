// SPDX-License-Identifier: Apache-2.0

mod attrs;
mod deserializer;
mod export;
mod reader;
mod section;

pub use self::export::export;
pub use self::reader::ProfileReader;
pub use self::section::{
    AliasSection, DnsSection, InterfaceSection, NetworkingSection,
    RouteSection, RoutingSection, S390DeviceSection, UdevRuleSection,
};
