//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod sync;

/// teamsync - declarative GitHub team reconciliation
#[derive(Parser, Debug)]
#[command(name = "teamsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true, env = "TEAMSYNC_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile organization teams against the manifest
    Sync(SyncArgs),

    /// Display version information
    Version,
}

/// Arguments for the sync command.
///
/// Each flag doubles as an Action-style input via its `INPUT_*` environment
/// fallback, so the binary can run unchanged inside a workflow step.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the teams manifest
    #[arg(
        long,
        env = "INPUT_CONFIG_PATH",
        default_value = ".github/teams.yaml",
        hide_env = true
    )]
    pub config: PathBuf,

    /// Organization to reconcile (defaults to the owner of GITHUB_REPOSITORY)
    #[arg(long, env = "INPUT_ORG", hide_env = true)]
    pub org: Option<String>,

    /// Compute and report the plan without applying it
    #[arg(
        long,
        env = "INPUT_DRY_RUN",
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value_t = false,
        hide_env = true
    )]
    pub dry_run: bool,
}
