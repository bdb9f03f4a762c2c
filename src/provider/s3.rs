//! Amazon S3 implementations of the provider traits.
//!
//! S3 only serves bucket level calls from the region a bucket lives in, so
//! every call for a bucket is routed through a client bound to the bucket's
//! region. Locations and clients are cached for the lifetime of a run.
use async_trait::async_trait;
use rusoto_s3::{
    BucketLoggingStatus, GetBucketLocationRequest, GetBucketLoggingRequest, LoggingEnabled,
    PutBucketLoggingRequest, S3Client, S3,
};

use std::collections::HashMap;
use std::sync::Mutex;

use super::{BucketInventory, LoggingProvider};
use crate::batch::ResourceId;
use crate::types::UtilResult;

/// Region S3 reports as an empty location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// The raw S3 calls made against a single regional endpoint.
#[async_trait]
pub trait BucketApi: Clone + Send + Sync {
    /// Lists the names of all buckets owned by the caller.
    async fn list_bucket_names(&self) -> UtilResult<Vec<String>>;

    /// Retrieves the location constraint of a bucket.
    async fn bucket_location(&self, bucket: &str) -> UtilResult<Option<String>>;

    /// Determines whether a bucket has a logging configuration.
    async fn bucket_logging(&self, bucket: &str) -> UtilResult<bool>;

    /// Writes a logging configuration to a bucket.
    async fn put_bucket_logging(&self, bucket: &str, target: &str, prefix: &str)
        -> UtilResult<()>;
}

#[async_trait]
impl BucketApi for S3Client {
    async fn list_bucket_names(&self) -> UtilResult<Vec<String>> {
        let output = self.list_buckets().await?;

        // buckets should always be there, but may be omitted when empty
        Ok(output
            .buckets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bucket| bucket.name)
            .collect())
    }

    async fn bucket_location(&self, bucket: &str) -> UtilResult<Option<String>> {
        let request = GetBucketLocationRequest {
            bucket: bucket.to_string(),
            ..GetBucketLocationRequest::default()
        };

        let output = self.get_bucket_location(request).await?;
        Ok(output.location_constraint)
    }

    async fn bucket_logging(&self, bucket: &str) -> UtilResult<bool> {
        let request = GetBucketLoggingRequest {
            bucket: bucket.to_string(),
            ..GetBucketLoggingRequest::default()
        };

        let output = self.get_bucket_logging(request).await?;
        Ok(output.logging_enabled.is_some())
    }

    async fn put_bucket_logging(
        &self,
        bucket: &str,
        target: &str,
        prefix: &str,
    ) -> UtilResult<()> {
        let status = BucketLoggingStatus {
            logging_enabled: Some(LoggingEnabled {
                target_bucket: target.to_string(),
                target_prefix: prefix.to_string(),
                ..LoggingEnabled::default()
            }),
        };

        let request = PutBucketLoggingRequest {
            bucket: bucket.to_string(),
            bucket_logging_status: status,
            ..PutBucketLoggingRequest::default()
        };

        S3::put_bucket_logging(self, request).await?;
        Ok(())
    }
}

/// Factory for clients bound to a named region.
type Connect<C> = Box<dyn Fn(&str) -> UtilResult<C> + Send + Sync>;

/// Provider routing bucket calls to the region of each bucket.
pub struct S3Provider<C = S3Client> {
    home: String,
    client: C,
    connect: Option<Connect<C>>,
    clients: Mutex<HashMap<String, C>>,
    locations: Mutex<HashMap<String, String>>,
}

impl<C: BucketApi> S3Provider<C> {
    /// Constructs a new provider sending every call through one client.
    pub fn new(home: &str, client: C) -> S3Provider<C> {
        S3Provider {
            home: home.to_string(),
            client,
            connect: None,
            clients: Mutex::new(HashMap::new()),
            locations: Mutex::new(HashMap::new()),
        }
    }

    /// Routes calls for buckets outside the home region through clients
    /// created by `connect`, one per region.
    pub fn routed<F>(mut self, connect: F) -> S3Provider<C>
    where
        F: Fn(&str) -> UtilResult<C> + Send + Sync + 'static,
    {
        self.connect = Some(Box::new(connect));
        self
    }

    /// Retrieves (or creates) the client able to serve a bucket.
    async fn client_for(&self, bucket: &str) -> UtilResult<C> {
        let connect = match &self.connect {
            Some(connect) => connect,
            None => return Ok(self.client.clone()),
        };

        let region = self.bucket_region(bucket).await?;
        if region == self.home {
            return Ok(self.client.clone());
        }

        let mut clients = self.clients.lock().expect("client cache poisoned");
        if let Some(client) = clients.get(&region) {
            return Ok(client.clone());
        }

        debug!("Connecting to {} for bucket {}", region, bucket);

        let client = connect(&region)?;
        clients.insert(region, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl<C: BucketApi> LoggingProvider for S3Provider<C> {
    /// Enables server access logging via `PutBucketLogging`.
    async fn enable_logging(
        &self,
        resource: &ResourceId,
        bucket: &str,
        prefix: &str,
    ) -> UtilResult<()> {
        let client = self.client_for(resource.handle()).await?;
        client
            .put_bucket_logging(resource.handle(), bucket, prefix)
            .await
    }
}

#[async_trait]
impl<C: BucketApi> BucketInventory for S3Provider<C> {
    async fn bucket_names(&self) -> UtilResult<Vec<String>> {
        self.client.list_bucket_names().await
    }

    async fn logging_enabled(&self, bucket: &str) -> UtilResult<bool> {
        let client = self.client_for(bucket).await?;
        client.bucket_logging(bucket).await
    }

    /// Location lookups are served from any region, so always go home.
    async fn bucket_region(&self, bucket: &str) -> UtilResult<String> {
        let cached = self
            .locations
            .lock()
            .expect("location cache poisoned")
            .get(bucket)
            .cloned();

        if let Some(region) = cached {
            return Ok(region);
        }

        let location = self.client.bucket_location(bucket).await?;
        let region = normalize_location(location);

        self.locations
            .lock()
            .expect("location cache poisoned")
            .insert(bucket.to_string(), region.clone());

        Ok(region)
    }
}

/// Maps a location constraint to a region name.
///
/// Buckets in the default region report no constraint at all, and very old
/// buckets in Ireland still report the legacy `EU` constraint.
fn normalize_location(location: Option<String>) -> String {
    match location.as_deref() {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}
