//! File-based snapshot store — lightweight persistence for cache entries.
//! One JSON file per repository, human-readable. Persistence is
//! best-effort: failures are logged by the caller and never affect
//! lookup results.

use chrono::{DateTime, Utc};
use flowlens_core::types::{RepoKey, WorkflowMap};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A persisted cache entry: the composed mapping plus when it was built.
/// Loaded snapshots go through the same freshness policy as in-memory
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub value: WorkflowMap,
    pub computed_at: DateTime<Utc>,
}

/// File-based snapshot store.
#[derive(Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: &Path) -> Self {
        std::fs::create_dir_all(dir).ok();
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn file_for(&self, repo: &RepoKey) -> PathBuf {
        self.dir.join(format!("{}__{}.json", repo.owner, repo.name))
    }

    /// Save a snapshot for one repository.
    pub fn save(&self, repo: &RepoKey, snapshot: &Snapshot) -> Result<(), String> {
        let file = self.file_for(repo);
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|e| format!("Serialize error: {e}"))?;
        std::fs::write(&file, &json).map_err(|e| format!("Write error: {e}"))?;
        tracing::debug!("Saved snapshot for {repo} to {}", file.display());
        Ok(())
    }

    /// Load the snapshot for one repository, if present and readable.
    pub fn load(&self, repo: &RepoKey) -> Option<Snapshot> {
        let file = self.file_for(repo);
        if !file.exists() {
            return None;
        }
        match std::fs::read_to_string(&file) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Failed to parse snapshot for {repo}: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read snapshot for {repo}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlens_core::types::ComposedWorkflow;

    fn snapshot() -> Snapshot {
        let mut value = WorkflowMap::new();
        value.insert(
            "ci.yml".into(),
            ComposedWorkflow {
                name: "ci.yml".into(),
                is_enabled: true,
                schedule: Some("0 0 * * *".into()),
                manually_dispatchable: false,
            },
        );
        Snapshot {
            value,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let repo = RepoKey::new("octo", "hello");

        let saved = snapshot();
        store.save(&repo, &saved).unwrap();

        let loaded = store.load(&repo).unwrap();
        assert_eq!(loaded.value, saved.value);
        assert_eq!(loaded.computed_at, saved.computed_at);
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(store.load(&RepoKey::new("octo", "nope")).is_none());
    }

    #[test]
    fn test_load_corrupt_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let repo = RepoKey::new("octo", "hello");
        std::fs::write(dir.path().join("octo__hello.json"), "not json").unwrap();
        assert!(store.load(&repo).is_none());
    }
}
