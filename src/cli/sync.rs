//! Sync command handler
//!
//! Resolves credentials and the target organization here, at the process
//! boundary, and hands the engine an explicit run configuration; nothing
//! below this layer reads the environment.

use colored::Colorize;
use log::info;

use crate::client::GitHubClient;
use crate::config::TeamsConfig;
use crate::error::{ConfigError, Result};
use crate::sync::{RunConfig, SyncEngine};

use super::SyncArgs;

/// Extract the owner half of an "owner/repo" value.
fn repo_owner(repo: &str) -> Option<&str> {
    match repo.split('/').next() {
        Some("") | None => None,
        Some(owner) => Some(owner),
    }
}

/// Resolve the target organization: explicit flag first, then the owner of
/// `GITHUB_REPOSITORY`.
fn resolve_org(flag: Option<String>) -> Result<String> {
    if let Some(org) = flag {
        return Ok(org);
    }
    std::env::var("GITHUB_REPOSITORY")
        .ok()
        .as_deref()
        .and_then(repo_owner)
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingOrg.into())
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let token = std::env::var("GITHUB_TOKEN").map_err(|_| ConfigError::MissingToken)?;
    let org = resolve_org(args.org)?;

    info!("Using config: {}", args.config.display());
    let config = TeamsConfig::load(&args.config)?;

    let client = match std::env::var("GITHUB_API_URL") {
        Ok(base) => GitHubClient::with_base_url(token, base)?,
        Err(_) => GitHubClient::new(token)?,
    };

    let engine = SyncEngine::new(
        client,
        RunConfig {
            org: org.clone(),
            dry_run: args.dry_run,
        },
    );
    let report = engine.sync(&config).await?;

    let verb = if args.dry_run { "planned" } else { "applied" };
    println!(
        "{} {} operation(s) {} for organization '{}'",
        "Done:".green().bold(),
        report.actions.len(),
        verb,
        org
    );
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    Ok(())
}
