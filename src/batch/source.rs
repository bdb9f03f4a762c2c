//! Sources of resources to feed through a batch.
//!
//! Resources either come from a newline-delimited file, or are discovered
//! by walking a paginated listing against the provider.
use async_trait::async_trait;
use regex::Regex;

use std::fs;
use std::path::PathBuf;

use super::{ResourceDescriptor, ResourceId};
use crate::types::{UtilError, UtilResult};
use crate::walker::{PageWalker, Paginated};

/// Trait for anything able to yield the full set of batch targets.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Produces every resource, in order.
    async fn resources(&self) -> UtilResult<Vec<ResourceId>>;
}

/// Source reading one identifier per line from a file.
///
/// Lines are trimmed and blank lines are dropped; duplicates are kept as
/// they are, so a duplicated line is processed twice.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Constructs a new `FileSource` for a path.
    pub fn new<P: Into<PathBuf>>(path: P) -> FileSource {
        FileSource { path: path.into() }
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    async fn resources(&self) -> UtilResult<Vec<ResourceId>> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            UtilError::config(format!(
                "Unable to read {}: {}",
                self.path.display(),
                err
            ))
        })?;

        Ok(parse_lines(&contents))
    }
}

/// Parses newline-delimited identifiers, skipping blank lines.
pub fn parse_lines(contents: &str) -> Vec<ResourceId> {
    contents.lines().filter_map(ResourceId::new).collect()
}

/// Filter applied to discovered resources.
#[derive(Debug, Default)]
pub struct Filter {
    kind: Option<String>,
    pattern: Option<Regex>,
}

impl Filter {
    /// Only keep resources of the provided kind.
    pub fn kind<S: Into<String>>(mut self, kind: S) -> Filter {
        self.kind = Some(kind.into());
        self
    }

    /// Only keep resources with a name matching the provided pattern.
    pub fn pattern(mut self, pattern: Regex) -> Filter {
        self.pattern = Some(pattern);
        self
    }

    /// Determines whether a descriptor passes this filter.
    pub fn matches(&self, descriptor: &ResourceDescriptor) -> bool {
        if let Some(kind) = &self.kind {
            if descriptor.kind.as_ref() != Some(kind) {
                return false;
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(descriptor.id.name()) {
                return false;
            }
        }
        true
    }
}

/// Source discovering resources from a paginated listing.
///
/// Discovery is all-or-nothing: if any page fails the whole listing fails,
/// as an incomplete listing would silently skip resources.
pub struct Discovery<'a, P> {
    listing: &'a P,
    filter: Filter,
}

impl<'a, P> Discovery<'a, P>
where
    P: Paginated<Item = ResourceDescriptor>,
{
    /// Constructs a new `Discovery` over a listing with a filter.
    pub fn new(listing: &'a P, filter: Filter) -> Discovery<'a, P> {
        Discovery { listing, filter }
    }
}

#[async_trait]
impl<'a, P> ResourceSource for Discovery<'a, P>
where
    P: Paginated<Item = ResourceDescriptor>,
{
    async fn resources(&self) -> UtilResult<Vec<ResourceId>> {
        let descriptors = PageWalker::new(self.listing).collect().await?;

        Ok(descriptors
            .into_iter()
            .filter(|descriptor| self.filter.matches(descriptor))
            .map(|descriptor| descriptor.id)
            .collect())
    }
}
