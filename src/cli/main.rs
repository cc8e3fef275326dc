// SPDX-License-Identifier: Apache-2.0

mod error;
mod export;
mod import;
mod rename;
mod show;
mod state;

pub(crate) use self::error::CliError;
use self::{
    export::CommandExport,
    import::CommandImport,
    rename::CommandRename,
    show::CommandShow,
    state::{ARG_CONFIG, ARG_HARDWARE, ARG_ROOT, Context},
};

fn main() -> Result<(), CliError> {
    let mut cli_cmd = clap::Command::new("sntctl")
        .about("sysnet persistent network configuration CLI")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            clap::Arg::new("quiet")
                .short('q')
                .action(clap::ArgAction::SetTrue)
                .help("Disable logging")
                .global(true),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .action(clap::ArgAction::Count)
                .help("Increase verbose level")
                .global(true),
        )
        .arg(
            clap::Arg::new(ARG_ROOT)
                .long("root")
                .short('r')
                .help("Directory holding the configuration files, default /")
                .global(true),
        )
        .arg(
            clap::Arg::new(ARG_CONFIG)
                .long("config")
                .short('c')
                .help("sysnet configuration YAML file")
                .global(true),
        )
        .arg(
            clap::Arg::new(ARG_HARDWARE)
                .long("hardware")
                .help(
                    "YAML list of network devices used instead of probing \
                     the running system",
                )
                .global(true),
        )
        .subcommand(CommandShow::new_cmd())
        .subcommand(CommandExport::new_cmd())
        .subcommand(CommandImport::new_cmd())
        .subcommand(CommandRename::new_cmd());

    let matches = cli_cmd.get_matches_mut();

    let (log_groups, log_level) = match matches.get_count("verbose") {
        0 => (vec!["sysnet", "sntctl"], log::LevelFilter::Warn),
        1 => (vec!["sysnet", "sntctl"], log::LevelFilter::Info),
        2 => (vec!["sysnet", "sntctl"], log::LevelFilter::Debug),
        3 => (
            vec!["sysnet", "sntctl", "sysnet_probe_nispor"],
            log::LevelFilter::Trace,
        ),
        _ => (vec![], log::LevelFilter::Trace),
    };

    if !matches.get_flag("quiet") {
        let mut log_builder = env_logger::Builder::new();
        if log_groups.is_empty() {
            log_builder.filter(None, log_level);
        } else {
            for log_group in log_groups {
                log_builder.filter(Some(log_group), log_level);
            }
        }
        log_builder.init();
    }

    log::info!("sntctl version: {}", clap::crate_version!());

    if let Err(e) = call_subcommand(&matches) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}

fn call_subcommand(matches: &clap::ArgMatches) -> Result<(), CliError> {
    let ctx = Context::new(matches)?;
    if let Some(matches) = matches.subcommand_matches(CommandShow::CMD) {
        CommandShow::handle(&ctx, matches)
    } else if let Some(matches) = matches.subcommand_matches(CommandExport::CMD)
    {
        CommandExport::handle(&ctx, matches)
    } else if let Some(matches) = matches.subcommand_matches(CommandImport::CMD)
    {
        CommandImport::handle(&ctx, matches)
    } else if let Some(matches) = matches.subcommand_matches(CommandRename::CMD)
    {
        CommandRename::handle(&ctx, matches)
    } else {
        Err(CliError::from("Unknown command"))
    }
}
