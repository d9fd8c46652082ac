//! Per-repository freshness cache with stale-while-revalidate.
//!
//! Policy:
//! - age ≤ 1 day: serve the stored mapping as-is.
//! - 1 day < age ≤ 11 days: serve the stored mapping immediately and kick
//!   off one background revalidation for that key. A failed revalidation
//!   is logged and swallowed; the stale entry stays until a later success.
//! - no entry, or age > 11 days: compute synchronously; a fetch failure
//!   propagates to the caller.
//!
//! At most one revalidation is in flight per repository: the flag is
//! checked-and-set under the map lock, so concurrent stale readers all get
//! the stored value and only the first spawns the refresh. The lock is
//! never held across a fetch await.

use chrono::{DateTime, Duration, Utc};
use flowlens_core::config::CacheConfig;
use flowlens_core::error::Result;
use flowlens_core::traits::WorkflowSource;
use flowlens_core::types::{RepoKey, WorkflowMap};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::aggregate::aggregate;
use crate::store::{Snapshot, SnapshotStore};

struct CacheEntry {
    value: WorkflowMap,
    computed_at: DateTime<Utc>,
    /// In-memory only: a background revalidation is outstanding.
    revalidating: bool,
}

/// What a lookup decided to do, resolved entirely under the map lock.
enum Plan {
    Serve(WorkflowMap),
    ServeAndRevalidate(WorkflowMap),
    Compute,
}

/// The cache owns all entry storage; values are immutable per generation.
pub struct FreshnessCache {
    source: Arc<dyn WorkflowSource>,
    entries: Arc<Mutex<HashMap<RepoKey, CacheEntry>>>,
    store: Option<SnapshotStore>,
    fresh: Duration,
    stale: Duration,
}

impl FreshnessCache {
    /// Create a cache with the configured policy and snapshot directory.
    pub fn new(source: Arc<dyn WorkflowSource>, config: &CacheConfig) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
            store: Some(SnapshotStore::new(&config.dir)),
            fresh: Duration::seconds(config.fresh_secs as i64),
            stale: Duration::seconds(config.stale_secs as i64),
        }
    }

    /// Create a cache without snapshot persistence.
    pub fn in_memory(source: Arc<dyn WorkflowSource>, fresh_secs: u64, stale_secs: u64) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
            store: None,
            fresh: Duration::seconds(fresh_secs as i64),
            stale: Duration::seconds(stale_secs as i64),
        }
    }

    /// Single public entry point: the composed mapping for one repository.
    pub async fn get_or_compute(&self, repo: &RepoKey) -> Result<WorkflowMap> {
        self.get_or_compute_at(repo, Utc::now()).await
    }

    /// Lookup with an explicit clock, so the freshness windows are
    /// testable without waiting out real days.
    pub async fn get_or_compute_at(&self, repo: &RepoKey, now: DateTime<Utc>) -> Result<WorkflowMap> {
        let plan = {
            let mut entries = self.entries.lock().await;

            // Lazy snapshot load on first miss; a loaded snapshot goes
            // through the same freshness decision below.
            if !entries.contains_key(repo)
                && let Some(store) = &self.store
                && let Some(snapshot) = store.load(repo)
            {
                entries.insert(
                    repo.clone(),
                    CacheEntry {
                        value: snapshot.value,
                        computed_at: snapshot.computed_at,
                        revalidating: false,
                    },
                );
            }

            match entries.get_mut(repo) {
                Some(entry) => {
                    let age = now - entry.computed_at;
                    if age <= self.fresh {
                        Plan::Serve(entry.value.clone())
                    } else if age <= self.fresh + self.stale {
                        if entry.revalidating {
                            Plan::Serve(entry.value.clone())
                        } else {
                            entry.revalidating = true;
                            Plan::ServeAndRevalidate(entry.value.clone())
                        }
                    } else {
                        Plan::Compute
                    }
                }
                None => Plan::Compute,
            }
        };

        match plan {
            Plan::Serve(value) => Ok(value),
            Plan::ServeAndRevalidate(value) => {
                self.spawn_revalidation(repo.clone());
                Ok(value)
            }
            Plan::Compute => {
                let value = compute(self.source.as_ref(), repo).await?;
                let mut entries = self.entries.lock().await;
                entries.insert(
                    repo.clone(),
                    CacheEntry {
                        value: value.clone(),
                        computed_at: now,
                        revalidating: false,
                    },
                );
                drop(entries);
                self.persist(repo, &value, now);
                Ok(value)
            }
        }
    }

    /// Refresh one key in the background. The caller already set the
    /// in-flight flag; this task clears it on completion either way.
    /// Runs detached: it is never cancelled by later lookups.
    fn spawn_revalidation(&self, repo: RepoKey) {
        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);
        let store = self.store.clone();
        tokio::spawn(async move {
            match compute(source.as_ref(), &repo).await {
                Ok(value) => {
                    let computed_at = Utc::now();
                    let mut entries = entries.lock().await;
                    entries.insert(
                        repo.clone(),
                        CacheEntry {
                            value: value.clone(),
                            computed_at,
                            revalidating: false,
                        },
                    );
                    drop(entries);
                    if let Some(store) = &store
                        && let Err(e) = store.save(&repo, &Snapshot { value, computed_at })
                    {
                        tracing::warn!("Snapshot save for {repo} failed: {e}");
                    }
                    tracing::debug!("Revalidated cache entry for {repo}");
                }
                Err(e) => {
                    // Swallowed: the stale entry stays authoritative until
                    // a later revalidation succeeds.
                    tracing::warn!("Background revalidation for {repo} failed: {e}");
                    let mut entries = entries.lock().await;
                    if let Some(entry) = entries.get_mut(&repo) {
                        entry.revalidating = false;
                    }
                }
            }
        });
    }

    fn persist(&self, repo: &RepoKey, value: &WorkflowMap, computed_at: DateTime<Utc>) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(
                repo,
                &Snapshot {
                    value: value.clone(),
                    computed_at,
                },
            )
        {
            tracing::warn!("Snapshot save for {repo} failed: {e}");
        }
    }
}

/// One full computation: both fetches run concurrently and both must
/// succeed — no partial aggregation from a single source.
async fn compute(source: &dyn WorkflowSource, repo: &RepoKey) -> Result<WorkflowMap> {
    let (summaries, definitions) = tokio::join!(
        source.fetch_workflow_list(repo),
        source.fetch_definitions(repo)
    );
    Ok(aggregate(summaries?, &definitions?))
}
