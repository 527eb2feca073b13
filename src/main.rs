//! teamsync - reconciles GitHub org teams against a declarative manifest

use clap::Parser;
use colored::Colorize;

mod cli;
mod client;
mod config;
mod error;
mod sync;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync(args) => cli::sync::run(args).await,
        Commands::Version => {
            println!("teamsync version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
