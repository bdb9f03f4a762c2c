//! Provider abstractions over the AWS services this tool talks to.
//!
//! Commands never talk to a Rusoto client directly; they go through the
//! traits in here so that the batch logic can be exercised without AWS.
use async_trait::async_trait;

use crate::batch::ResourceId;
use crate::types::UtilResult;

pub mod elb;
pub mod s3;

#[cfg(test)]
pub mod mock;

/// Provider of the single mutating "enable logging" call.
///
/// Implementations are expected to be idempotent; re-applying the same
/// configuration is a no-op on the provider side.
#[async_trait]
pub trait LoggingProvider: Send + Sync {
    /// Enables access logging for a resource into a bucket/prefix pair.
    async fn enable_logging(&self, resource: &ResourceId, bucket: &str, prefix: &str)
        -> UtilResult<()>;
}

/// Provider of bucket metadata, used when scanning buckets.
#[async_trait]
pub trait BucketInventory: Send + Sync {
    /// Lists the names of all buckets owned by the caller.
    async fn bucket_names(&self) -> UtilResult<Vec<String>>;

    /// Determines whether access logging is enabled for a bucket.
    async fn logging_enabled(&self, bucket: &str) -> UtilResult<bool>;

    /// Retrieves the region a bucket lives in.
    async fn bucket_region(&self, bucket: &str) -> UtilResult<String>;
}
