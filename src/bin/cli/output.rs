//! Output formatting for automation-cli
//!
//! Plain-text tables for terminal use. JSON output is serde's rendering of the
//! library types and lives with each command.

use automation_fetcher::Position;
use automation_transport::NetworkConfig;

/// One row per position, followed by a count line.
pub fn format_positions(positions: &[Position]) -> String {
    let mut out = String::new();
    if positions.is_empty() {
        out.push_str("No positions found\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:<14} {:<30} {:<42} {:<8} {:>10}\n",
        "SUB IDS", "PROTOCOL", "STRATEGY", "OWNER", "ENABLED", "BLOCK"
    ));
    for position in positions {
        out.push_str(&format!(
            "{:<12} {:<14} {:<30} {:<42} {:<8} {:>10}\n",
            format_sub_ids(position),
            position.protocol.id,
            position.strategy.strategy_id.as_str(),
            position.owner.to_checksum(None),
            if position.enabled { "yes" } else { "no" },
            position.block_number,
        ));
    }
    out.push_str(&format!("\n{} position(s)\n", positions.len()));
    out
}

fn format_sub_ids(position: &Position) -> String {
    match &position.sub_ids {
        Some(ids) => ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("+"),
        None => position.sub_id.to_string(),
    }
}

pub fn format_networks(networks: &[NetworkConfig]) -> String {
    let mut out = format!(
        "{:<10} {:>8} {:<42} {:<42} {:>12}\n",
        "NETWORK", "CHAIN ID", "MULTICALL", "REGISTRY", "DEPLOY BLOCK"
    );
    for network in networks {
        let registry = network
            .sub_storage
            .map(|address| address.to_checksum(None))
            .unwrap_or_else(|| "(not configured)".to_string());
        out.push_str(&format!(
            "{:<10} {:>8} {:<42} {:<42} {:>12}\n",
            network.chain.name(),
            network.chain.id(),
            network.multicall.to_checksum(None),
            registry,
            network.deploy_block,
        ));
    }
    out
}
