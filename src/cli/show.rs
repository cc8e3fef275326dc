// SPDX-License-Identifier: Apache-2.0

use crate::{
    CliError,
    state::{Context, print_issues},
};

pub(crate) struct CommandShow;

impl CommandShow {
    pub(crate) const CMD: &str = "show";

    pub(crate) fn new_cmd() -> clap::Command {
        clap::Command::new("show")
            .alias("s")
            .about("Show persistent network configuration")
            .arg(
                clap::Arg::new("SHOW_SECRETS")
                    .long("show-secrets")
                    .short('s')
                    .action(clap::ArgAction::SetTrue)
                    .help("Show passwords and keys"),
            )
    }

    pub(crate) fn handle(
        ctx: &Context,
        matches: &clap::ArgMatches,
    ) -> Result<(), CliError> {
        let mut result = ctx.read()?;
        if !matches.get_flag("SHOW_SECRETS") {
            result.config.hide_secrets();
        }
        print_issues(&result.issues);
        println!("{}", serde_yaml::to_string(&result.config)?);
        Ok(())
    }
}
