//! Core data model: workflow summaries, composed records, and indicators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FlowlensError;

/// Repository identity — the cache key. One cache entry per repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoKey {
    pub owner: String,
    pub name: String,
}

impl RepoKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoKey {
    type Err = FlowlensError;

    /// Parse `owner/repo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(FlowlensError::Config(format!(
                "Invalid repository '{s}' (expected OWNER/REPO)"
            ))),
        }
    }
}

/// One entry from the workflow list endpoint.
///
/// `name` is the final `/`-segment of the path the API reports, which is
/// known to be unreliable: it may be empty, and a deleted workflow may
/// still show up as active. Nothing is validated here; the aggregator's
/// join against the definition files is what establishes presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Base filename of the workflow definition, e.g. `ci.yml`.
    pub name: String,
    pub is_enabled: bool,
}

/// Schedule and dispatch facts scanned out of a raw definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDetails {
    /// Raw cron expression as written in the file, if a `schedule:` block
    /// with a `cron:` key was found. Not validated — the projector decides
    /// whether it yields a next run.
    pub schedule: Option<String>,
    /// The file declares a `workflow_dispatch:` trigger.
    pub manually_dispatchable: bool,
}

/// A workflow summary joined with the details extracted from its
/// definition file. Immutable once produced for a cache generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedWorkflow {
    pub name: String,
    pub is_enabled: bool,
    pub schedule: Option<String>,
    pub manually_dispatchable: bool,
}

impl ComposedWorkflow {
    pub fn compose(summary: WorkflowSummary, details: WorkflowDetails) -> Self {
        Self {
            name: summary.name,
            is_enabled: summary.is_enabled,
            schedule: details.schedule,
            manually_dispatchable: details.manually_dispatchable,
        }
    }
}

/// The per-repository mapping the cache stores and callers consume.
pub type WorkflowMap = HashMap<String, ComposedWorkflow>;

/// Resolved indicators for one workflow, ready for a renderer.
/// The three indicators are independent, not mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowIndicators {
    pub disabled: bool,
    pub dispatchable: bool,
    pub next_run: Option<DateTime<Utc>>,
}
