//! In-memory providers for exercising batch logic in tests.
use async_trait::async_trait;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::s3::BucketApi;
use super::{BucketInventory, LoggingProvider};
use crate::batch::{ResourceDescriptor, ResourceId};
use crate::types::{UtilError, UtilResult};
use crate::walker::{Page, Paginated};

/// A single recorded call to `enable_logging`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub handle: String,
    pub bucket: String,
    pub prefix: String,
}

/// Logging provider which records calls, failing for selected handles.
#[derive(Default)]
pub struct MockLogging {
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockLogging {
    pub fn new() -> MockLogging {
        MockLogging::default()
    }

    pub fn failing_for(handles: &[&str]) -> MockLogging {
        MockLogging {
            failing: handles.iter().map(|h| h.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoggingProvider for MockLogging {
    async fn enable_logging(
        &self,
        resource: &ResourceId,
        bucket: &str,
        prefix: &str,
    ) -> UtilResult<()> {
        self.calls.lock().unwrap().push(Call {
            handle: resource.handle().to_string(),
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        });

        if self.failing.contains(resource.handle()) {
            return Err(UtilError::provider("Access Denied"));
        }
        Ok(())
    }
}

/// Listing which serves pre-built pages, optionally failing one of them.
pub struct MockListing {
    pages: Vec<Vec<ResourceDescriptor>>,
    fail_at: Option<usize>,
}

impl MockListing {
    pub fn new(pages: Vec<Vec<ResourceDescriptor>>) -> MockListing {
        MockListing {
            pages,
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, page: usize) -> MockListing {
        self.fail_at = Some(page);
        self
    }
}

#[async_trait]
impl Paginated for MockListing {
    type Item = ResourceDescriptor;

    async fn page(&self, token: Option<String>) -> UtilResult<Page<ResourceDescriptor>> {
        let index = token.map_or(0, |t| t.parse().unwrap());

        if self.fail_at == Some(index) {
            return Err(UtilError::provider("Rate exceeded"));
        }

        let next = if index + 1 < self.pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(Page {
            items: self.pages.get(index).cloned().unwrap_or_default(),
            next,
        })
    }
}

/// Builds a load balancer descriptor with a fake ARN.
pub fn load_balancer(name: &str, kind: &str) -> ResourceDescriptor {
    let arn = format!("arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/{}", name);
    ResourceDescriptor {
        id: ResourceId::with_handle(name, &arn).unwrap(),
        kind: Some(kind.to_string()),
    }
}

/// Bucket inventory backed by a fixed set of buckets.
#[derive(Default)]
pub struct MockInventory {
    buckets: Vec<(String, bool, String)>,
    broken: Option<String>,
    region_calls: Mutex<usize>,
}

impl MockInventory {
    /// Constructs an inventory from `(name, logging_enabled, region)` triples.
    pub fn new(buckets: &[(&str, bool, &str)]) -> MockInventory {
        MockInventory {
            buckets: buckets
                .iter()
                .map(|(name, enabled, region)| (name.to_string(), *enabled, region.to_string()))
                .collect(),
            ..MockInventory::default()
        }
    }

    /// Fails logging lookups for the named bucket.
    pub fn broken_for(mut self, bucket: &str) -> MockInventory {
        self.broken = Some(bucket.to_string());
        self
    }

    pub fn region_calls(&self) -> usize {
        *self.region_calls.lock().unwrap()
    }

    fn lookup(&self) -> HashMap<&str, (bool, &str)> {
        self.buckets
            .iter()
            .map(|(name, enabled, region)| (name.as_str(), (*enabled, region.as_str())))
            .collect()
    }
}

#[async_trait]
impl BucketInventory for MockInventory {
    async fn bucket_names(&self) -> UtilResult<Vec<String>> {
        Ok(self.buckets.iter().map(|(name, _, _)| name.clone()).collect())
    }

    async fn logging_enabled(&self, bucket: &str) -> UtilResult<bool> {
        if self.broken.as_deref() == Some(bucket) {
            return Err(UtilError::provider("NoSuchBucket"));
        }
        Ok(self.lookup()[bucket].0)
    }

    async fn bucket_region(&self, bucket: &str) -> UtilResult<String> {
        *self.region_calls.lock().unwrap() += 1;
        Ok(self.lookup()[bucket].1.to_string())
    }
}

/// Shared state behind every `FakeS3` handle.
#[derive(Default)]
struct FakeS3State {
    buckets: Vec<(String, String, bool)>,
    calls: Mutex<Vec<(String, String, String)>>,
}

/// Regional S3 endpoint which only serves buckets living in its region.
///
/// Bucket level calls for a bucket in another region fail the same way S3
/// answers with a `PermanentRedirect`; location lookups work everywhere.
#[derive(Clone)]
pub struct FakeS3 {
    region: String,
    state: Arc<FakeS3State>,
}

impl FakeS3 {
    /// Constructs buckets from `(name, region, logging_enabled)` triples.
    pub fn new(buckets: &[(&str, &str, bool)]) -> FakeS3 {
        FakeS3 {
            region: "us-east-1".to_string(),
            state: Arc::new(FakeS3State {
                buckets: buckets
                    .iter()
                    .map(|(name, region, enabled)| (name.to_string(), region.to_string(), *enabled))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns a handle bound to another region, sharing all state.
    pub fn in_region(&self, region: &str) -> FakeS3 {
        FakeS3 {
            region: region.to_string(),
            state: self.state.clone(),
        }
    }

    /// Counts the calls made for an operation, across all regions.
    pub fn count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|(_, op, _)| op == operation).count()
    }

    /// Lists the `(region, bucket)` pairs logging was written for.
    pub fn puts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter(|(_, op, _)| op == "put")
            .map(|(region, _, bucket)| (region, bucket))
            .collect()
    }

    fn calls(&self) -> Vec<(String, String, String)> {
        self.state.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, bucket: &str) {
        self.state.calls.lock().unwrap().push((
            self.region.clone(),
            operation.to_string(),
            bucket.to_string(),
        ));
    }

    fn find(&self, bucket: &str) -> UtilResult<&(String, String, bool)> {
        self.state
            .buckets
            .iter()
            .find(|(name, _, _)| name == bucket)
            .ok_or_else(|| UtilError::provider("NoSuchBucket"))
    }

    fn local(&self, bucket: &str) -> UtilResult<bool> {
        let (_, region, enabled) = self.find(bucket)?;
        if *region != self.region {
            return Err(UtilError::provider(
                "The bucket you are attempting to access must be addressed using the specified endpoint.",
            ));
        }
        Ok(*enabled)
    }
}

#[async_trait]
impl BucketApi for FakeS3 {
    async fn list_bucket_names(&self) -> UtilResult<Vec<String>> {
        Ok(self.state.buckets.iter().map(|(name, _, _)| name.clone()).collect())
    }

    async fn bucket_location(&self, bucket: &str) -> UtilResult<Option<String>> {
        self.record("location", bucket);
        let (_, region, _) = self.find(bucket)?;
        Ok(Some(region.clone()).filter(|region| region != "us-east-1"))
    }

    async fn bucket_logging(&self, bucket: &str) -> UtilResult<bool> {
        self.record("logging", bucket);
        self.local(bucket)
    }

    async fn put_bucket_logging(
        &self,
        bucket: &str,
        _target: &str,
        _prefix: &str,
    ) -> UtilResult<()> {
        self.local(bucket)?;
        self.record("put", bucket);
        Ok(())
    }
}
