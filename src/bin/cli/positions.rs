//! Positions command - reconstruct automation positions for one network.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use automation_fetcher::{AutomationReader, QueryOptions};
use automation_transport::BlockRef;
use automation_types::ChainId;
use clap::Parser;

use super::output;

#[derive(Parser, Debug)]
#[command(about = "Reconstruct positions from the subscription registry")]
pub struct PositionsCmd {
    /// Network name or chain id: mainnet, optimism, arbitrum, base
    #[arg(long, default_value = "mainnet")]
    pub chain: ChainId,

    /// JSON-RPC endpoint for the network
    #[arg(long, env = "AUTOMATION_RPC_URL")]
    pub rpc_url: String,

    /// Only positions created by this wallet (repeatable)
    #[arg(long = "owner", value_name = "ADDRESS")]
    pub owners: Vec<Address>,

    /// Combine repay/boost legs into single leverage-management positions
    #[arg(long)]
    pub merge: bool,

    /// Drop disabled subscriptions
    #[arg(long)]
    pub enabled_only: bool,

    /// Drop limit orders past their expiry
    #[arg(long)]
    pub unexpired_only: bool,

    /// Snapshot block (default: latest)
    #[arg(long)]
    pub block: Option<u64>,

    /// First block to scan for registry events (default: registry deployment)
    #[arg(long)]
    pub from_block: Option<u64>,

    /// Maximum blocks per eth_getLogs request (default: AUTOMATION_LOG_SPAN or unbounded)
    #[arg(long)]
    pub log_span: Option<u64>,
}

impl PositionsCmd {
    pub fn query_options(&self) -> QueryOptions {
        let mut options = QueryOptions::default()
            .with_merge(self.merge)
            .enabled_only(self.enabled_only)
            .unexpired_only(self.unexpired_only);
        if let Some(block) = self.block {
            options = options.at_block(BlockRef::Number(block));
        }
        if let Some(block) = self.from_block {
            options = options.from_block(block);
        }
        if let Some(span) = self.log_span {
            options = options.with_log_span(span);
        }
        options
    }

    pub async fn execute(&self, json: bool) -> Result<()> {
        let reader = AutomationReader::from_rpc_url(&self.rpc_url, self.chain)
            .await
            .with_context(|| format!("Failed to connect to {} at {}", self.chain, self.rpc_url))?;

        let options = self.query_options();
        let positions = if self.owners.is_empty() {
            reader.get_subscriptions(&options).await?
        } else {
            reader.get_subscriptions_for(&self.owners, &options).await?
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&positions)?);
        } else {
            print!("{}", output::format_positions(&positions));
        }
        Ok(())
    }
}
