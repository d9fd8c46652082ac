//! Row-facing entry point: the function a row-discovery collaborator
//! (DOM observer, CLI loop, anything that finds workflow rows) registers
//! against. Flowlens itself has no opinion about the event model.

use chrono::Utc;
use flowlens_core::config::FlowlensConfig;
use flowlens_core::error::Result;
use flowlens_core::traits::WorkflowSource;
use flowlens_core::types::{RepoKey, WorkflowIndicators, WorkflowMap};
use std::sync::Arc;

use crate::cache::FreshnessCache;
use crate::resolve::resolve_indicators;

/// Per-row indicator resolution over the freshness cache.
pub struct IndicatorService {
    cache: FreshnessCache,
}

impl IndicatorService {
    pub fn new(source: Arc<dyn WorkflowSource>, config: &FlowlensConfig) -> Self {
        Self {
            cache: FreshnessCache::new(source, &config.cache),
        }
    }

    /// Service backed by a cache without snapshot persistence.
    pub fn with_cache(cache: FreshnessCache) -> Self {
        Self { cache }
    }

    /// Resolve indicators for one discovered row.
    ///
    /// `row_ref` is an opaque reference string whose final `/`-segment is
    /// the workflow filename (e.g. a link to
    /// `.../actions/workflows/ci.yml`, or just `ci.yml`). Returns `None`
    /// for names the join dropped — no indicator, no error.
    pub async fn resolve_row(
        &self,
        repo: &RepoKey,
        row_ref: &str,
    ) -> Result<Option<WorkflowIndicators>> {
        let name = row_ref.rsplit('/').next().unwrap_or_default();
        let workflows = self.cache.get_or_compute(repo).await?;
        Ok(workflows
            .get(name)
            .map(|workflow| resolve_indicators(workflow, Utc::now())))
    }

    /// The full composed mapping for one repository (renderer bulk path).
    pub async fn workflows(&self, repo: &RepoKey) -> Result<WorkflowMap> {
        self.cache.get_or_compute(repo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowlens_core::types::WorkflowSummary;
    use std::collections::HashMap;

    struct FixedSource;

    #[async_trait]
    impl WorkflowSource for FixedSource {
        async fn fetch_workflow_list(&self, _repo: &RepoKey) -> Result<Vec<WorkflowSummary>> {
            Ok(vec![
                WorkflowSummary {
                    name: "ci.yml".into(),
                    is_enabled: false,
                },
                WorkflowSummary {
                    name: "".into(),
                    is_enabled: true,
                },
            ])
        }

        async fn fetch_definitions(&self, _repo: &RepoKey) -> Result<HashMap<String, String>> {
            let mut definitions = HashMap::new();
            definitions.insert(
                "ci.yml".into(),
                "on:\n  workflow_dispatch:\n  schedule:\n    - cron: '30 5 * * 1'".into(),
            );
            Ok(definitions)
        }
    }

    fn service() -> IndicatorService {
        IndicatorService::with_cache(FreshnessCache::in_memory(
            Arc::new(FixedSource),
            86_400,
            864_000,
        ))
    }

    #[tokio::test]
    async fn test_row_name_is_last_path_segment() {
        let repo = RepoKey::new("octo", "hello");
        let indicators = service()
            .resolve_row(&repo, "/octo/hello/actions/workflows/ci.yml")
            .await
            .unwrap()
            .unwrap();
        assert!(indicators.disabled);
        assert!(indicators.dispatchable);
        assert!(indicators.next_run.is_some());
    }

    #[tokio::test]
    async fn test_bare_name_also_resolves() {
        let repo = RepoKey::new("octo", "hello");
        let indicators = service().resolve_row(&repo, "ci.yml").await.unwrap();
        assert!(indicators.is_some());
    }

    #[tokio::test]
    async fn test_dropped_row_yields_none_not_error() {
        let repo = RepoKey::new("octo", "hello");
        let service = service();
        // The empty-name summary was dropped by the join.
        assert!(service.resolve_row(&repo, "").await.unwrap().is_none());
        // Unknown names too.
        assert!(
            service
                .resolve_row(&repo, "a/b/missing.yml")
                .await
                .unwrap()
                .is_none()
        );
    }
}
