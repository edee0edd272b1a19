//! # Animix Farm - Multi-account mini-game farming
//!
//! Entry point: parses the CLI, installs logging and wires adapters into
//! the account cycle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs   - CLI, logging, banner                               │
//! │  runner.rs - Catalogs + accounts ─▶ batches of AccountCycle      │
//! │                 │                                               │
//! │                 ├── HttpGameGateway  (farm-adapter)              │
//! │                 ├── FileUserAgentStore (farm-adapter)            │
//! │                 └── RandomPicker     (farm-adapter)              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!   animix-farm              - Loop over all accounts forever
//!   animix-farm once         - Single pass, then exit
//!   animix-farm check        - Validate config, catalogs and accounts

mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use shared::FarmConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::runner::Runner;

#[derive(Parser)]
#[command(name = "animix-farm")]
#[command(about = "Animix - Telegram mini-game farming bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the YAML configuration
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Ignore proxy.txt even when use_proxy is set
    #[arg(long, global = true)]
    no_proxy: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Loop over all accounts with a cooldown between passes (default)
    Run,
    /// Run a single pass over all accounts
    Once,
    /// Load config, catalogs and accounts, then report
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    show_banner();

    let mut config = FarmConfig::load_or_default(&cli.config)?;
    if cli.no_proxy {
        config.use_proxy = false;
    }
    let runner = Runner::prepare(config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => runner.run_forever().await,
        Commands::Once => {
            let summary = runner.run_pass().await;
            info!(
                "Pass finished | Completed: {} | Failed: {} | Timed out: {}",
                summary.completed, summary.failed, summary.timed_out
            );
            Ok(())
        }
        Commands::Check => {
            println!(
                "{} {} accounts, {} mission templates, {} pet templates",
                style("✓").green(),
                runner.accounts().len(),
                runner.catalogs().missions.len(),
                runner.catalogs().pets.len()
            );
            Ok(())
        }
    }
}

fn show_banner() {
    println!("{}", style("Animix Farm").cyan().bold());
    println!("{}", style("Gacha · breeding · missions · quests · PVP").dim());
    println!();
}
