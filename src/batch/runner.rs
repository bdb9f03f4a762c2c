//! Sequential execution of a batch across all resources of a source.
use std::time::Instant;

use super::applier;
use super::config::{RunOptions, TargetConfig};
use super::report::Reporter;
use super::source::ResourceSource;
use super::RunSummary;
use crate::provider::LoggingProvider;
use crate::types::UtilResult;

/// Runs a batch, applying the configuration to every resource in `source`.
///
/// Resources are gathered up front and processed one at a time; a failing
/// resource is recorded and skipped rather than aborting the batch. The
/// only errors returned are those raised by the source itself.
pub async fn run<S, L, R>(
    source: &S,
    provider: &L,
    config: &TargetConfig,
    options: &RunOptions,
    reporter: &R,
) -> UtilResult<RunSummary>
where
    S: ResourceSource + ?Sized,
    L: LoggingProvider + ?Sized,
    R: Reporter + ?Sized,
{
    let start_time = Instant::now();
    let resources = source.resources().await?;

    // nothing to do is fine
    if resources.is_empty() {
        reporter.info("No resources found to configure");
        return Ok(RunSummary::default());
    }

    let total = resources.len();
    let mut records = Vec::with_capacity(total);

    reporter.info(&format!("Found {} resources, processing...", total));

    for (idx, resource) in resources.iter().enumerate() {
        reporter.progress(idx + 1, total);
        records.push(applier::apply(provider, resource, config, options, reporter).await);
    }

    let summary = RunSummary::from_records(records);

    // task done, so report execution time (to the second)
    let elapsed = std::time::Duration::from_secs(start_time.elapsed().as_secs());

    reporter.info(&format!(
        "Processed {} resources in {}: {} succeeded, {} failed, {} skipped",
        summary.total,
        humantime::format_duration(elapsed),
        summary.succeeded,
        summary.failed,
        summary.skipped(),
    ));

    Ok(summary)
}
