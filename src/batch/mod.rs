//! Batch application of a logging configuration across many resources.
//!
//! A batch is driven in three steps: a `ResourceSource` yields the targets,
//! the `applier` mutates (or pretends to mutate) each one of them, and the
//! `runner` ties both together and folds the outcomes into a `RunSummary`.
use std::fmt::{self, Display, Formatter};

pub mod applier;
pub mod config;
pub mod report;
pub mod runner;
pub mod source;

/// Identifier of a single cloud resource.
///
/// The `name` is what users see and what log prefixes are derived from;
/// the `handle` is what the mutating call addresses. They only differ for
/// resources which are addressed by ARN, such as load balancers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceId {
    name: String,
    handle: String,
}

impl ResourceId {
    /// Constructs a `ResourceId` addressed by its own name.
    ///
    /// Returns `None` if the name is empty after trimming whitespace.
    pub fn new(name: &str) -> Option<ResourceId> {
        let name = name.trim();
        Self::with_handle(name, name)
    }

    /// Constructs a `ResourceId` addressed by a separate handle.
    pub fn with_handle(name: &str, handle: &str) -> Option<ResourceId> {
        let name = name.trim();
        let handle = handle.trim();

        if name.is_empty() || handle.is_empty() {
            return None;
        }

        Some(ResourceId {
            name: name.to_string(),
            handle: handle.to_string(),
        })
    }

    /// Retrieves the display name of this resource.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves the handle used to address this resource in API calls.
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A resource as returned from a discovery listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub id: ResourceId,
    pub kind: Option<String>,
}

/// The outcome of applying configuration to a single resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub resource: ResourceId,
    pub applied: bool,
    pub error: Option<String>,
}

impl OutcomeRecord {
    /// Record for a resource which was successfully configured.
    pub fn applied(resource: ResourceId) -> OutcomeRecord {
        OutcomeRecord {
            resource,
            applied: true,
            error: None,
        }
    }

    /// Record for a resource which was only reported (dry run).
    pub fn skipped(resource: ResourceId) -> OutcomeRecord {
        OutcomeRecord {
            resource,
            applied: false,
            error: None,
        }
    }

    /// Record for a resource which the provider failed to configure.
    pub fn failed(resource: ResourceId, error: String) -> OutcomeRecord {
        OutcomeRecord {
            resource,
            applied: false,
            error: Some(error),
        }
    }
}

/// Aggregate result of a batch run, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: Vec<OutcomeRecord>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Folds a set of records into a summary.
    pub fn from_records(records: Vec<OutcomeRecord>) -> RunSummary {
        let (succeeded, failed) =
            records
                .iter()
                .fold((0, 0), |(succeeded, failed), record| {
                    match (record.applied, &record.error) {
                        (true, _) => (succeeded + 1, failed),
                        (false, Some(_)) => (succeeded, failed + 1),
                        (false, None) => (succeeded, failed),
                    }
                });

        RunSummary {
            total: records.len(),
            succeeded,
            failed,
            records,
        }
    }

    /// Number of resources which were neither applied nor failed.
    pub fn skipped(&self) -> usize {
        self.total - self.succeeded - self.failed
    }
}
