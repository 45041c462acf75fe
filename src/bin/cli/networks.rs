//! Networks command - show per-network contract configuration.

use anyhow::Result;
use automation_transport::NetworkConfig;
use automation_types::ChainId;
use clap::Parser;

use super::output;

#[derive(Parser, Debug)]
#[command(about = "Show contract configuration for every supported network")]
pub struct NetworksCmd {}

impl NetworksCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let networks: Vec<NetworkConfig> = ChainId::ALL
            .into_iter()
            .map(NetworkConfig::from_env)
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&networks)?);
        } else {
            print!("{}", output::format_networks(&networks));
        }
        Ok(())
    }
}
