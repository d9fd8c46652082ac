//! Flowlens configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FlowlensError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowlensConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Personal access token. Empty means unauthenticated (the client
    /// falls back to the GITHUB_TOKEN env var at construction).
    #[serde(default)]
    pub token: String,
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: String::new(),
        }
    }
}

/// Freshness policy and snapshot location for the per-repository cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries younger than this are served as-is. Default 1 day.
    #[serde(default = "default_fresh_secs")]
    pub fresh_secs: u64,
    /// Additional window past `fresh_secs` in which a stale entry is still
    /// served while a background revalidation runs. Default 10 days.
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
    /// Directory for JSON snapshots (~/.flowlens/cache).
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

fn default_fresh_secs() -> u64 {
    24 * 60 * 60
}
fn default_stale_secs() -> u64 {
    10 * 24 * 60 * 60
}
fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flowlens")
        .join("cache")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fresh_secs: default_fresh_secs(),
            stale_secs: default_stale_secs(),
            dir: default_cache_dir(),
        }
    }
}

impl FlowlensConfig {
    /// Load config from the default path (~/.flowlens/config.toml), or
    /// defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FlowlensError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| FlowlensError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".flowlens")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlowlensConfig::default();
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.cache.fresh_secs, 86_400);
        assert_eq!(config.cache.stale_secs, 864_000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FlowlensConfig = toml::from_str(
            r#"
            [github]
            token = "ghp_example"
            "#,
        )
        .unwrap();
        assert_eq!(config.github.token, "ghp_example");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.cache.fresh_secs, 86_400);
    }
}
