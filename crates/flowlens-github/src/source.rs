//! GitHub REST implementation of `WorkflowSource`.

use async_trait::async_trait;
use flowlens_core::config::GithubConfig;
use flowlens_core::error::{FlowlensError, Result};
use flowlens_core::traits::WorkflowSource;
use flowlens_core::types::{RepoKey, WorkflowSummary};
use serde::Deserialize;
use std::collections::HashMap;

const WORKFLOWS_DIR: &str = ".github/workflows";
const PER_PAGE: usize = 100;

/// GitHub REST client for the two workflow datasets.
pub struct GithubSource {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

impl GithubSource {
    /// Create a source from config. An empty config token falls back to
    /// the GITHUB_TOKEN env var; both empty means unauthenticated.
    pub fn new(config: &GithubConfig) -> Self {
        let token = if config.token.is_empty() {
            std::env::var("GITHUB_TOKEN").unwrap_or_default()
        } else {
            config.token.clone()
        };
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("User-Agent", "flowlens")
            .header("Accept", "application/vnd.github+json");
        if !self.token.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.token));
        }
        req
    }
}

/// `GET /repos/{owner}/{repo}/actions/workflows` page payload.
#[derive(Debug, Deserialize)]
struct WorkflowListPage {
    workflows: Vec<WorkflowEntry>,
}

/// One workflow as the list endpoint reports it. The endpoint is known to
/// be unreliable: `path` may be empty, and a deleted workflow may still be
/// listed as active. Both are tolerated here and sorted out by the join.
#[derive(Debug, Deserialize)]
struct WorkflowEntry {
    #[serde(default)]
    path: String,
    #[serde(default)]
    state: String,
}

impl WorkflowEntry {
    /// Final `/`-segment of the reported path, possibly empty.
    fn file_name(&self) -> String {
        self.path.rsplit('/').next().unwrap_or_default().to_string()
    }
}

/// One entry from the contents endpoint for the workflows directory.
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[async_trait]
impl WorkflowSource for GithubSource {
    async fn fetch_workflow_list(&self, repo: &RepoKey) -> Result<Vec<WorkflowSummary>> {
        let mut summaries = Vec::new();
        let mut page = 1usize;
        loop {
            let url = self.api_url(&format!(
                "/repos/{}/{}/actions/workflows",
                repo.owner, repo.name
            ));
            let response = self
                .get(&url)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await
                .map_err(|e| FlowlensError::Transport(format!("Workflow list failed: {e}")))?;

            if !response.status().is_success() {
                return Err(FlowlensError::Transport(format!(
                    "Workflow list for {repo} returned {}",
                    response.status()
                )));
            }

            let body: WorkflowListPage = response
                .json()
                .await
                .map_err(|e| FlowlensError::Transport(format!("Invalid workflow list: {e}")))?;

            let fetched = body.workflows.len();
            summaries.extend(body.workflows.into_iter().map(|entry| WorkflowSummary {
                name: entry.file_name(),
                is_enabled: entry.state == "active",
            }));

            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }
        tracing::debug!("Fetched {} workflow summaries for {repo}", summaries.len());
        Ok(summaries)
    }

    async fn fetch_definitions(&self, repo: &RepoKey) -> Result<HashMap<String, String>> {
        let url = self.api_url(&format!(
            "/repos/{}/{}/contents/{WORKFLOWS_DIR}",
            repo.owner, repo.name
        ));
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| FlowlensError::Transport(format!("Contents listing failed: {e}")))?;

        // A repo without a workflows directory has no definitions.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(HashMap::new());
        }
        if !response.status().is_success() {
            return Err(FlowlensError::Transport(format!(
                "Contents listing for {repo} returned {}",
                response.status()
            )));
        }

        let entries: Vec<ContentsEntry> = response
            .json()
            .await
            .map_err(|e| FlowlensError::Transport(format!("Invalid contents listing: {e}")))?;

        // Only plain files contribute; subdirectories are skipped. Raw
        // texts are fetched concurrently — there is no ordering dependency.
        let files: Vec<(String, String)> = entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .filter_map(|entry| entry.download_url.map(|url| (entry.name, url)))
            .collect();

        let fetches = files.into_iter().map(|(name, url)| async move {
            let response = self
                .get(&url)
                .send()
                .await
                .map_err(|e| FlowlensError::Transport(format!("Fetch of {name} failed: {e}")))?;
            if !response.status().is_success() {
                return Err(FlowlensError::Transport(format!(
                    "Fetch of {name} returned {}",
                    response.status()
                )));
            }
            let text = response
                .text()
                .await
                .map_err(|e| FlowlensError::Transport(format!("Read of {name} failed: {e}")))?;
            Ok((name, text))
        });

        let definitions: HashMap<String, String> = futures::future::try_join_all(fetches)
            .await?
            .into_iter()
            .collect();
        tracing::debug!("Fetched {} workflow definitions for {repo}", definitions.len());
        Ok(definitions)
    }
}
