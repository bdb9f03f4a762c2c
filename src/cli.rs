//! CLI bindings for all internal commands and modules.
//!
//! This module focuses on the common CLI bindings required to provide easy
//! APIs and consistency across all other modules. This is where the parent
//! CLI can be found, as well as utilities for fetching common switches and
//! values.
use clap::{App, AppSettings, Arg, ArgMatches};

use crate::batch::config::RunOptions;
use crate::types::UtilResult;

/// Region used when neither `--region` nor `AWS_REGION` are provided.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Constructs a new CLI application using Clap.
///
/// This will register all subcommand modules and embed all metadata. All
/// metadata is fetched dynamically from Cargo and shouldn't require to
/// be updated (ever).
pub fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("")
        .name(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(crate::buckets::cmd())
        .subcommand(crate::lbs::cmd())
        .subcommand(crate::scan::cmd())
        .settings(&[
            AppSettings::ArgRequiredElseHelp,
            AppSettings::DisableHelpSubcommand,
            AppSettings::SubcommandRequiredElseHelp,
            AppSettings::VersionlessSubcommands,
        ])
}

/// Executes a subcommand based on the parsed arguments from the CLI.
///
/// Logging is initialized here, as the logging switches live on each of
/// the subcommands rather than on the parent application.
pub async fn exec(args: &ArgMatches<'_>) -> UtilResult<()> {
    match args.subcommand() {
        ("buckets", Some(subargs)) => {
            crate::log::init(subargs)?;
            crate::buckets::exec(subargs).await
        }
        ("lbs", Some(subargs)) => {
            crate::log::init(subargs)?;
            crate::lbs::exec(subargs).await
        }
        ("scan", Some(subargs)) => {
            crate::log::init(subargs)?;
            crate::scan::exec(subargs).await
        }
        _ => {
            build().print_help()?;
            Ok(())
        }
    }
}

/// Fetches the set of global arguments which should be attached on each command.
pub fn global_args<'a, 'b>() -> [Arg<'a, 'b>; 4] {
    [
        Arg::with_name("quiet")
            .help("Only prints errors during execution")
            .short("q")
            .long("quiet")
            .conflicts_with("verbose"),
        Arg::with_name("verbose")
            .help("Prints debug output, including progress")
            .short("v")
            .long("verbose"),
        Arg::with_name("region")
            .help("The AWS region to operate within")
            .short("r")
            .long("region")
            .takes_value(true)
            .env("AWS_REGION")
            .default_value(DEFAULT_REGION),
        Arg::with_name("endpoint")
            .help("A custom endpoint to send AWS requests to")
            .long("endpoint")
            .takes_value(true),
    ]
}

/// Fetches the set of arguments shared by commands which mutate resources.
pub fn target_args<'a, 'b>() -> [Arg<'a, 'b>; 2] {
    [
        Arg::with_name("dry")
            .help("Only print out the calculated changes")
            .short("d")
            .long("dry-run"),
        Arg::with_name("target")
            .help("The S3 bucket to deliver access logs to")
            .short("t")
            .long("target-bucket")
            .takes_value(true)
            .required(true),
    ]
}

/// Determines if the dry-run switch was provided in this execution.
pub fn is_dry_run(args: &ArgMatches<'_>) -> bool {
    args.is_present("dry")
}

/// Builds the `RunOptions` for this execution.
pub fn run_options(args: &ArgMatches<'_>) -> RunOptions {
    RunOptions {
        dry_run: is_dry_run(args),
        region: args
            .value_of("region")
            .unwrap_or(DEFAULT_REGION)
            .to_string(),
        endpoint: args.value_of("endpoint").map(str::to_string),
    }
}
