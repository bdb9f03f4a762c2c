//! Locate S3 buckets which have no access logging configured.
//!
//! This is a read-only audit; nothing is mutated. Region lookups cost an
//! extra call per bucket, so grouping by region is only done on request.
use clap::{App, Arg, ArgMatches, SubCommand};

use std::collections::BTreeMap;

use crate::cli;
use crate::provider::BucketInventory;
use crate::session::Session;
use crate::types::UtilResult;

/// Buckets found without access logging.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub missing: Vec<String>,
    pub regions: Option<BTreeMap<String, Vec<String>>>,
}

/// Generates an appropriate `SubCommand` for this module.
pub fn cmd<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("scan")
        .about("Scan for S3 buckets missing access logging")
        .args(&cli::global_args())
        .arg(
            Arg::with_name("group")
                .help("Group buckets by region (one extra call per bucket)")
                .short("g")
                .long("group-by-region"),
        )
}

/// Executes this subcommand and returns a `UtilResult` to indicate success.
pub async fn exec(args: &ArgMatches<'_>) -> UtilResult<()> {
    let options = cli::run_options(args);
    options.validate()?;

    let session = Session::new(&options)?;

    info!("Scanning buckets for missing access logging...");

    let report = missing_logging(session.s3(), args.is_present("group")).await?;
    print(&report);

    Ok(())
}

/// Finds every bucket without logging, optionally grouped by region.
///
/// Any failed lookup fails the whole scan, rather than reporting a list
/// which may be missing buckets.
pub async fn missing_logging<I>(inventory: &I, group_by_region: bool) -> UtilResult<ScanReport>
where
    I: BucketInventory + ?Sized,
{
    let mut report = ScanReport::default();

    for bucket in inventory.bucket_names().await? {
        if !inventory.logging_enabled(&bucket).await? {
            report.missing.push(bucket);
        }
    }

    if group_by_region {
        let mut regions: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for bucket in &report.missing {
            let region = inventory.bucket_region(bucket).await?;
            regions.entry(region).or_default().push(bucket.clone());
        }
        report.regions = Some(regions);
    }

    Ok(report)
}

/// Logs out a `ScanReport` in a readable format.
fn print(report: &ScanReport) {
    if report.missing.is_empty() {
        info!("All buckets have access logging enabled");
        return;
    }

    info!(
        "Found {} buckets without access logging:",
        report.missing.len()
    );

    match &report.regions {
        Some(regions) => {
            for (region, buckets) in regions {
                info!("Region: {}", region);
                for bucket in buckets {
                    info!("  - {}", bucket);
                }
            }
        }
        None => {
            for bucket in &report.missing {
                info!("  - {}", bucket);
            }
        }
    }
}
