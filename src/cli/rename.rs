// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use sysnet::{RenamingMechanism, Writer};

use crate::{
    CliError,
    state::{Context, print_issues, print_summary},
};

pub(crate) struct CommandRename;

impl CommandRename {
    pub(crate) const CMD: &str = "rename";

    pub(crate) fn new_cmd() -> clap::Command {
        clap::Command::new("rename")
            .alias("r")
            .about("Rename interface and pin the new name by udev rule")
            .arg(
                clap::Arg::new("OLD_NAME")
                    .required(true)
                    .index(1)
                    .help("Current interface name"),
            )
            .arg(
                clap::Arg::new("NEW_NAME")
                    .required(true)
                    .index(2)
                    .help("New interface name"),
            )
            .arg(
                clap::Arg::new("MECHANISM")
                    .long("mechanism")
                    .short('m')
                    .default_value("mac")
                    .value_parser(["mac", "bus-id", "none"])
                    .help("Hardware attribute the udev rule matches"),
            )
    }

    pub(crate) fn handle(
        ctx: &Context,
        matches: &clap::ArgMatches,
    ) -> Result<(), CliError> {
        let (Some(old_name), Some(new_name), Some(mechanism)) = (
            matches.get_one::<String>("OLD_NAME"),
            matches.get_one::<String>("NEW_NAME"),
            matches.get_one::<String>("MECHANISM"),
        ) else {
            return Err(CliError::from("Missing argument"));
        };
        let mechanism = RenamingMechanism::from_str(mechanism)?;

        let current = ctx.read()?;
        print_issues(&current.issues);
        let mut config = current.config.clone();
        config.rename_interface(old_name, new_name, mechanism)?;
        for name in config.bond_ports_using_mac_renaming() {
            log::warn!(
                "Bonding port {name} is renamed by MAC address which is \
                 shared by all bonding ports, consider --mechanism bus-id"
            );
        }
        let summary =
            Writer::new(&ctx.conf).write(&config, Some(&current.config))?;
        print_summary(&summary);
        Ok(())
    }
}
