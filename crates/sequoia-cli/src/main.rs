// crates/sequoia-cli/src/main.rs
//
// CLI entrypoint for the Sequoia operator tools.
//
// Provides subcommands for building allowlist Merkle roots and proofs,
// inspecting the reward rate table, quoting accruals, and running the
// canned farming and presale scenarios against in-memory collaborators.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use commands::merkle::MerkleCmd;
use commands::rates::QuoteCmd;
use commands::simulate::SimulateCmd;
use config::SequoiaConfig;

/// Sequoia CLI: tiered position farming and allowlist sale tooling.
#[derive(Parser, Debug)]
#[command(
    name = "sequoia",
    version = "0.1.0",
    about = "Sequoia operator CLI: allowlist Merkle tooling, reward quotes, scenario simulation"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "sequoia.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Allowlist Merkle tooling: root, proof, verify.
    #[command(subcommand)]
    Merkle(MerkleCmd),

    /// Display the per-block and per-day reward for every rarity class.
    Rates,

    /// Quote the reward a position of a given class accrues over N blocks.
    Quote(QuoteCmd),

    /// Run the canned farming and presale scenarios.
    Simulate(SimulateCmd),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The file is optional; a missing or unreadable one falls back to defaults.
    let loaded = SequoiaConfig::load(&cli.config);
    let log_level = match &loaded {
        Ok(cfg) => cfg.log_level.clone(),
        Err(_) => SequoiaConfig::default().log_level,
    };

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match loaded {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", cli.config);
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "Could not load config from {}: {}. Using defaults.",
                cli.config,
                e
            );
            SequoiaConfig::default()
        }
    };

    match &cli.command {
        Commands::Merkle(cmd) => commands::merkle::run(cmd)?,
        Commands::Rates => commands::rates::run_rates(&config)?,
        Commands::Quote(cmd) => commands::rates::run_quote(cmd, &config)?,
        Commands::Simulate(cmd) => commands::simulate::run(cmd, &config)?,
    }

    Ok(())
}
