// SPDX-License-Identifier: Apache-2.0

mod conn_attrs;
mod file;
mod hosts;
mod merge;
mod reader;
mod routes_file;
mod writer;

pub use self::merge::merge_files;
pub use self::reader::{ReadResult, Reader};
pub use self::writer::{WriteSummary, Writer};

pub(crate) use self::{
    conn_attrs::{dump_conn, load_conn},
    file::{KeyValueFile, KeyValueStyle, parse_bool},
    reader::apply_udev_rules,
};

#[cfg(test)]
pub(crate) use self::{
    conn_attrs::IfcfgTypeSource, hosts::HostsFile, routes_file::parse_routes,
};
