//! Provider session shared across a single run.
//!
//! All clients are constructed once, up front, and then only borrowed by
//! the commands; there is no global client state. The only exception is
//! S3, which lazily connects to the regions buckets actually live in.
use rusoto_core::{credential::ChainProvider, region::Region, HttpClient};
use rusoto_elbv2::ElbClient;
use rusoto_s3::S3Client;

use std::str::FromStr;
use std::time::Duration;

use crate::batch::config::RunOptions;
use crate::provider::elb::ElbProvider;
use crate::provider::s3::S3Provider;
use crate::types::UtilResult;

/// Set of AWS providers bound to a single region.
pub struct Session {
    region: Region,
    s3: S3Provider,
    elb: ElbProvider,
}

impl Session {
    /// Constructs a new `Session` for the region in the provided options.
    pub fn new(options: &RunOptions) -> UtilResult<Session> {
        let region = options.region()?;

        let s3 = S3Client::new_with(HttpClient::new()?, chain(), region.clone());
        let elb = ElbClient::new_with(HttpClient::new()?, chain(), region.clone());

        // custom endpoints serve every bucket, so there's nothing to route
        let s3 = match region {
            Region::Custom { .. } => S3Provider::new(region.name(), s3),
            _ => S3Provider::new(region.name(), s3).routed(connect_s3),
        };

        debug!("Created session for region {}", region.name());

        Ok(Session {
            region,
            s3,
            elb: ElbProvider::new(elb),
        })
    }

    /// Retrieves the region this session is bound to.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Retrieves the S3 provider.
    pub fn s3(&self) -> &S3Provider {
        &self.s3
    }

    /// Retrieves the load balancer provider.
    pub fn elb(&self) -> &ElbProvider {
        &self.elb
    }
}

/// Creates an `S3Client` bound to a named region.
fn connect_s3(name: &str) -> UtilResult<S3Client> {
    let region = Region::from_str(name)?;
    Ok(S3Client::new_with(HttpClient::new()?, chain(), region))
}

/// Creates a credentials chain with a short timeout.
fn chain() -> ChainProvider {
    let mut chain = ChainProvider::new();
    chain.set_timeout(Duration::from_millis(500));
    chain
}
