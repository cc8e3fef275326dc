// SPDX-License-Identifier: Apache-2.0

use std::{io::Read, path::Path};

use sysnet::{
    HardwareProbe, Issues, ReadResult, Reader, StaticHardware, SysnetConfig,
    WriteSummary,
};
use sysnet_probe_nispor::NisporProbe;

use super::CliError;

pub(crate) const ARG_ROOT: &str = "ROOT";
pub(crate) const ARG_CONFIG: &str = "CONFIG";
pub(crate) const ARG_HARDWARE: &str = "HARDWARE";

/// Global options shared by every command.
pub(crate) struct Context {
    pub(crate) conf: SysnetConfig,
    probe: Box<dyn HardwareProbe>,
}

impl Context {
    pub(crate) fn new(matches: &clap::ArgMatches) -> Result<Self, CliError> {
        let mut conf = match matches.get_one::<String>(ARG_CONFIG) {
            Some(path) => SysnetConfig::from_yaml_file(Path::new(path))?,
            None => SysnetConfig::default(),
        };
        if let Some(root) = matches.get_one::<String>(ARG_ROOT) {
            conf.root = root.into();
        }
        let probe: Box<dyn HardwareProbe> =
            match matches.get_one::<String>(ARG_HARDWARE) {
                Some(path) => Box::new(serde_yaml::from_str::<StaticHardware>(
                    &content_from_file(path)?,
                )?),
                None => Box::new(NisporProbe::new()),
            };
        log::debug!("Using configuration {}", conf);
        Ok(Self { conf, probe })
    }

    pub(crate) fn probe(&self) -> &dyn HardwareProbe {
        self.probe.as_ref()
    }

    pub(crate) fn read(&self) -> Result<ReadResult, CliError> {
        Ok(Reader::new(&self.conf, self.probe()).read()?)
    }
}

pub(crate) fn content_from_file(file_path: &str) -> Result<String, CliError> {
    let mut content = String::new();
    if file_path == "-" {
        std::io::stdin().read_to_string(&mut content)?;
    } else {
        std::fs::File::open(file_path)?.read_to_string(&mut content)?;
    }
    // Replace non-breaking space '\u{A0}' to normal space
    Ok(content.replace('\u{A0}', " "))
}

/// Each issue is already logged as warning when recorded.
pub(crate) fn print_issues(issues: &Issues) {
    if !issues.is_empty() {
        eprintln!(
            "{} entries could not be understood and were skipped",
            issues.len()
        );
    }
}

pub(crate) fn print_summary(summary: &WriteSummary) {
    if summary.is_empty() {
        println!("Nothing changed");
        return;
    }
    for path in summary.written.iter() {
        println!("Written {}", path.display());
    }
    for path in summary.removed.iter() {
        println!("Removed {}", path.display());
    }
}
