// SPDX-License-Identifier: Apache-2.0

use sysnet::{NetworkingSection, ProfileReader, Writer};

use crate::{
    CliError,
    state::{Context, content_from_file, print_issues, print_summary},
};

pub(crate) struct CommandImport;

impl CommandImport {
    pub(crate) const CMD: &str = "import";

    pub(crate) fn new_cmd() -> clap::Command {
        clap::Command::new("import")
            .alias("i")
            .about("Import networking section of profile and store it")
            .arg(
                clap::Arg::new("PROFILE_FILE")
                    .required(false)
                    .index(1)
                    .help("YAML or JSON networking section, '-' for stdin"),
            )
            .arg(
                clap::Arg::new("DRY_RUN")
                    .long("dry-run")
                    .short('d')
                    .action(clap::ArgAction::SetTrue)
                    .help("Print the imported configuration only"),
            )
    }

    pub(crate) fn handle(
        ctx: &Context,
        matches: &clap::ArgMatches,
    ) -> Result<(), CliError> {
        let file_path = matches
            .get_one::<String>("PROFILE_FILE")
            .map(String::as_str)
            .unwrap_or("-");
        let section =
            NetworkingSection::from_yaml_str(&content_from_file(file_path)?)?;
        let imported = ProfileReader::new(ctx.probe()).read(&section)?;
        print_issues(&imported.issues);

        if matches.get_flag("DRY_RUN") {
            let mut config = imported.config;
            config.hide_secrets();
            println!("{}", serde_yaml::to_string(&config)?);
            return Ok(());
        }
        let current = ctx.read()?;
        let summary = Writer::new(&ctx.conf)
            .write(&imported.config, Some(&current.config))?;
        print_summary(&summary);
        Ok(())
    }
}
