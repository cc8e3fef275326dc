// SPDX-License-Identifier: Apache-2.0

//! [sysnet::HardwareProbe] of the running system.
//!
//! ```no_run
//! use sysnet::{Reader, SysnetConfig};
//! use sysnet_probe_nispor::NisporProbe;
//!
//! let conf = SysnetConfig::default();
//! let probe = NisporProbe::new();
//! let result = Reader::new(&conf, &probe).read().unwrap();
//! println!("{}", result.config);
//! ```

mod error;
mod probe;
mod sysfs;

#[cfg(test)]
mod unit_tests;

pub use self::probe::NisporProbe;
