//! The fetch seam: anything that can produce the two raw datasets.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{RepoKey, WorkflowSummary};

/// A backend that can fetch the two independent datasets the aggregator
/// joins: the configured workflow list (with enabled state) and the raw
/// definition file texts keyed by filename.
///
/// The two fetches have no ordering dependency; the engine runs them
/// concurrently and requires both to succeed before aggregating.
#[async_trait]
pub trait WorkflowSource: Send + Sync {
    /// Fetch the configured workflows and their enabled/disabled state.
    ///
    /// Implementations must tolerate unreliable upstream data (empty or
    /// garbage paths) by deriving `name` as the final path segment, even
    /// when that produces an empty or duplicate name. Deduplication and
    /// validation are not this trait's job.
    async fn fetch_workflow_list(&self, repo: &RepoKey) -> Result<Vec<WorkflowSummary>>;

    /// Fetch raw definition text for every plain file directly under the
    /// workflows directory, keyed by filename. An empty directory yields
    /// an empty mapping, not an error.
    async fn fetch_definitions(&self, repo: &RepoKey) -> Result<HashMap<String, String>>;
}
