//! # Flowlens CLI
//!
//! Prints status indicators for a repository's GitHub Actions workflows:
//! disabled state, manual dispatchability, and the next scheduled run.
//!
//! Usage:
//!   flowlens rust-lang/cargo             # human-readable table
//!   flowlens rust-lang/cargo --json      # machine-readable
//!   flowlens rust-lang/cargo --token T   # authenticated (higher rate limit)

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use flowlens_core::FlowlensConfig;
use flowlens_core::types::RepoKey;
use flowlens_engine::{IndicatorService, resolve_indicators};
use flowlens_github::GithubSource;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "flowlens",
    version,
    about = "🔎 Flowlens — status indicators for GitHub Actions workflows"
)]
struct Cli {
    /// Repository, as OWNER/REPO
    repo: RepoKey,

    /// GitHub token (overrides config and GITHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "flowlens=debug"
    } else {
        "flowlens=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let mut config = FlowlensConfig::load()?;
    if let Some(token) = cli.token {
        config.github.token = token;
    }

    let source = Arc::new(GithubSource::new(&config.github));
    let service = IndicatorService::new(source, &config);

    let workflows = service.workflows(&cli.repo).await?;
    let now = Utc::now();

    if cli.json {
        let resolved: std::collections::BTreeMap<_, _> = workflows
            .iter()
            .map(|(name, workflow)| (name.clone(), resolve_indicators(workflow, now)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    if workflows.is_empty() {
        println!("No workflows found for {}", cli.repo);
        return Ok(());
    }

    let mut names: Vec<_> = workflows.keys().collect();
    names.sort();
    for name in names {
        let indicators = resolve_indicators(&workflows[name], now);
        let mut markers = Vec::new();
        if indicators.disabled {
            markers.push("🚫 disabled".to_string());
        }
        if indicators.dispatchable {
            markers.push("▶️ manual".to_string());
        }
        if let Some(next_run) = indicators.next_run {
            markers.push(format!("⏰ next {}", next_run.format("%Y-%m-%d %H:%M UTC")));
        }
        if markers.is_empty() {
            println!("{name}");
        } else {
            println!("{name}  —  {}", markers.join(", "));
        }
    }
    Ok(())
}
