//! automation-cli: inspect on-chain automation positions
//!
//! Reconstructs automation subscriptions (leverage management, close-on-price,
//! trailing stops, DCA, limit orders) from the registry's events and canonical
//! records and prints them as a table or JSON.
//!
//! ## Example Usage
//!
//! ```bash
//! # Every position on mainnet, repay/boost legs combined
//! automation-cli positions --chain mainnet --rpc-url https://eth.llamarpc.com --merge
//!
//! # Positions for two wallets at a fixed block, as JSON
//! automation-cli positions --owner 0xabc... --owner 0xdef... --block 19000000 --json
//!
//! # Contract configuration per network
//! automation-cli networks
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{networks::NetworksCmd, positions::PositionsCmd};

#[derive(Parser)]
#[command(
    name = "automation-cli",
    author,
    version,
    about = "Read-only viewer for DeFi automation positions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct positions from the subscription registry
    Positions(PositionsCmd),

    /// Show contract configuration for every supported network
    Networks(NetworksCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { command, json } = Cli::parse();
    match command {
        Commands::Positions(cmd) => cmd.execute(json).await,
        Commands::Networks(cmd) => cmd.execute(json),
    }
}
