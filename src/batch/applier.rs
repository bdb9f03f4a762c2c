//! Application of a logging configuration to a single resource.
use super::config::{RunOptions, TargetConfig};
use super::report::Reporter;
use super::{OutcomeRecord, ResourceId};
use crate::provider::LoggingProvider;

/// Applies the target configuration to a single resource.
///
/// This never fails; provider errors are captured in the returned record
/// so that a single failure cannot abort the surrounding batch. In dry run
/// mode the provider is never called, and only the intent is reported.
pub async fn apply<L, R>(
    provider: &L,
    resource: &ResourceId,
    config: &TargetConfig,
    options: &RunOptions,
    reporter: &R,
) -> OutcomeRecord
where
    L: LoggingProvider + ?Sized,
    R: Reporter + ?Sized,
{
    // derive the location for this resource
    let prefix = config.prefix_for(resource);
    let target = format!("s3://{}/{}", config.bucket(), prefix);

    // skip
    if options.dry_run {
        reporter.info(&format!(
            "[dry-run] Would enable access logging for {} -> {}",
            resource, target
        ));
        return OutcomeRecord::skipped(resource.clone());
    }

    match provider
        .enable_logging(resource, config.bucket(), &prefix)
        .await
    {
        Ok(()) => {
            reporter.info(&format!(
                "Enabled access logging for {} -> {}",
                resource, target
            ));
            OutcomeRecord::applied(resource.clone())
        }
        Err(err) => {
            reporter.error(&format!(
                "Unable to enable access logging for {}: {}",
                resource, err
            ));
            OutcomeRecord::failed(resource.clone(), err.message().to_string())
        }
    }
}
