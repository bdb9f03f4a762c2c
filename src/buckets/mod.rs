//! Enable S3 server access logging for a list of buckets.
//!
//! Bucket names are read from a file, one per line, and each bucket has
//! its logs delivered under `<prefix>/<bucket>/` in the target bucket.
use clap::{App, Arg, ArgMatches, SubCommand};

use std::path::Path;

use crate::batch::config::{self, TargetConfig};
use crate::batch::report::LogReporter;
use crate::batch::runner;
use crate::batch::source::FileSource;
use crate::cli;
use crate::session::Session;
use crate::types::{UtilError, UtilResult};

/// Generates an appropriate `SubCommand` for this module.
pub fn cmd<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("buckets")
        .about("Enable access logging for S3 buckets listed in a file")
        .args(&cli::global_args())
        .args(&cli::target_args())
        .args(&[
            Arg::with_name("file")
                .help("A file containing bucket names, one per line")
                .short("f")
                .long("file")
                .takes_value(true)
                .required(true),
            Arg::with_name("prefix")
                .help("A base prefix to deliver logs under")
                .short("p")
                .long("prefix")
                .takes_value(true)
                .default_value("access-logs"),
        ])
}

/// Executes this subcommand and returns a `UtilResult` to indicate success.
pub async fn exec(args: &ArgMatches<'_>) -> UtilResult<()> {
    // parse all global arguments
    let options = cli::run_options(args);

    // unwrap should be safe, as these are required or defaulted
    let file = Path::new(args.value_of("file").unwrap());
    let target = TargetConfig::new(
        args.value_of("target").unwrap(),
        args.value_of("prefix").unwrap(),
    )
    .with_trailing_separator();

    // validate everything before touching anything
    config::validate(&options, &target)?;
    config::validate_file(file)?;

    let session = Session::new(&options)?;
    let source = FileSource::new(file);

    let summary = runner::run(&source, session.s3(), &target, &options, &LogReporter).await?;

    if summary.failed > 0 {
        return Err(UtilError::provider(format!(
            "Failed to configure {} of {} buckets",
            summary.failed, summary.total
        )));
    }

    Ok(())
}
