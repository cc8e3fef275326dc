// SPDX-License-Identifier: Apache-2.0

use crate::{
    CliError,
    state::{Context, print_issues},
};

pub(crate) struct CommandExport;

impl CommandExport {
    pub(crate) const CMD: &str = "export";

    pub(crate) fn new_cmd() -> clap::Command {
        clap::Command::new("export")
            .alias("e")
            .about("Export configuration as networking section of profile")
            .arg(
                clap::Arg::new("SHOW_SECRETS")
                    .long("show-secrets")
                    .short('s')
                    .action(clap::ArgAction::SetTrue)
                    .help("Include passwords and keys"),
            )
    }

    pub(crate) fn handle(
        ctx: &Context,
        matches: &clap::ArgMatches,
    ) -> Result<(), CliError> {
        let result = ctx.read()?;
        print_issues(&result.issues);
        let mut section = sysnet::export(&result.config);
        if !matches.get_flag("SHOW_SECRETS") {
            section.hide_secrets();
        }
        println!("{}", serde_yaml::to_string(&section)?);
        Ok(())
    }
}
