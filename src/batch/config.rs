//! Run configuration and up-front validation.
//!
//! Everything in here is checked once, before any file is read or any
//! call is made against AWS.
use rusoto_core::Region;

use std::path::Path;
use std::str::FromStr;

use super::ResourceId;
use crate::types::{UtilError, UtilResult};

/// Separator used between log prefix segments.
pub const SEPARATOR: char = '/';

/// The logging destination to apply to every resource in a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetConfig {
    bucket: String,
    prefix: String,
    trailing_separator: bool,
}

impl TargetConfig {
    /// Constructs a new `TargetConfig` for a bucket and base prefix.
    pub fn new<B, P>(bucket: B, prefix: P) -> TargetConfig
    where
        B: Into<String>,
        P: Into<String>,
    {
        TargetConfig {
            bucket: bucket.into().trim().to_string(),
            prefix: prefix.into().trim().to_string(),
            trailing_separator: false,
        }
    }

    /// Terminates every derived prefix with a separator.
    pub fn with_trailing_separator(mut self) -> TargetConfig {
        self.trailing_separator = true;
        self
    }

    /// Retrieves the bucket receiving the logs.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Retrieves the base prefix, normalized to end with a separator.
    pub fn base_prefix(&self) -> String {
        let mut prefix = self.prefix.clone();
        if !prefix.ends_with(SEPARATOR) {
            prefix.push(SEPARATOR);
        }
        prefix
    }

    /// Derives the log prefix for a single resource.
    pub fn prefix_for(&self, resource: &ResourceId) -> String {
        let mut prefix = self.base_prefix();
        prefix.push_str(resource.name());
        if self.trailing_separator {
            prefix.push(SEPARATOR);
        }
        prefix
    }

    /// Validates the target fields.
    pub fn validate(&self) -> UtilResult<()> {
        if self.bucket.is_empty() {
            return Err(UtilError::config("Target bucket must not be empty"));
        }
        if self.prefix.is_empty() {
            return Err(UtilError::config("Prefix must not be empty"));
        }
        Ok(())
    }
}

/// Options governing a single run of the tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub region: String,
    pub endpoint: Option<String>,
}

impl RunOptions {
    /// Resolves the configured region (and endpoint) into a `Region`.
    pub fn region(&self) -> UtilResult<Region> {
        let name = self.region.trim();

        if name.is_empty() {
            return Err(UtilError::config("Region must not be empty"));
        }

        match &self.endpoint {
            Some(endpoint) => Ok(Region::Custom {
                name: name.to_string(),
                endpoint: endpoint.to_string(),
            }),
            None => Ok(Region::from_str(name)?),
        }
    }

    /// Validates the run options.
    pub fn validate(&self) -> UtilResult<()> {
        self.region().map(|_| ())
    }
}

/// Validates a full run configuration before any I/O takes place.
pub fn validate(options: &RunOptions, config: &TargetConfig) -> UtilResult<()> {
    options.validate()?;
    config.validate()
}

/// Validates that an input file exists ahead of reading it.
pub fn validate_file(path: &Path) -> UtilResult<()> {
    if !path.is_file() {
        return Err(UtilError::config(format!(
            "File not found: {}",
            path.display()
        )));
    }
    Ok(())
}
