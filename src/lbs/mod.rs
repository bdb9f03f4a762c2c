//! Enable access logging for Elastic Load Balancers across a region.
//!
//! Every load balancer in the region is discovered (optionally filtered by
//! type or name) and has its logs delivered under `<prefix>/<name>`.
use clap::{App, Arg, ArgMatches, SubCommand};
use regex::Regex;

use crate::batch::config::{self, TargetConfig};
use crate::batch::report::LogReporter;
use crate::batch::runner;
use crate::batch::source::{Discovery, Filter};
use crate::cli;
use crate::session::Session;
use crate::types::{UtilError, UtilResult};

/// Load balancer types which can be filtered on.
const TYPES: &[&str] = &["application", "network", "gateway"];

/// Generates an appropriate `SubCommand` for this module.
pub fn cmd<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("lbs")
        .about("Enable access logging for load balancers in a region")
        .args(&cli::global_args())
        .args(&cli::target_args())
        .args(&[
            Arg::with_name("prefix")
                .help("A base prefix to deliver logs under")
                .short("p")
                .long("prefix")
                .takes_value(true)
                .required(true),
            Arg::with_name("type")
                .help("Only configure load balancers of this type")
                .long("type")
                .takes_value(true)
                .possible_values(TYPES),
            Arg::with_name("match")
                .help("Only configure load balancers with names matching a pattern")
                .short("m")
                .long("match")
                .takes_value(true),
        ])
}

/// Executes this subcommand and returns a `UtilResult` to indicate success.
pub async fn exec(args: &ArgMatches<'_>) -> UtilResult<()> {
    // parse all global arguments
    let options = cli::run_options(args);

    // unwrap should be safe, as these are required
    let target = TargetConfig::new(
        args.value_of("target").unwrap(),
        args.value_of("prefix").unwrap(),
    );

    // validate everything before touching anything
    config::validate(&options, &target)?;
    let filter = filter(args)?;

    let session = Session::new(&options)?;
    let source = Discovery::new(session.elb(), filter);

    info!(
        "Scanning for load balancers in region: {}",
        session.region().name()
    );

    let summary = runner::run(&source, session.elb(), &target, &options, &LogReporter).await?;

    if summary.failed > 0 {
        return Err(UtilError::provider(format!(
            "Failed to configure {} of {} load balancers",
            summary.failed, summary.total
        )));
    }

    Ok(())
}

/// Builds the discovery `Filter` from the provided arguments.
fn filter(args: &ArgMatches<'_>) -> UtilResult<Filter> {
    let mut filter = Filter::default();

    if let Some(kind) = args.value_of("type") {
        filter = filter.kind(kind);
    }

    if let Some(pattern) = args.value_of("match") {
        filter = filter.pattern(Regex::new(pattern)?);
    }

    Ok(filter)
}
