//! Per-network contract configuration.

use alloy_primitives::{address, Address};
use automation_types::{env_var, ChainId};
use serde::Serialize;

/// Multicall3, deployed at the same address on every supported network.
pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

const MAINNET_SUB_STORAGE: Address = address!("1612fc28Ee0AB882eC99842Cde0Fc77ff0691e90");
const MAINNET_SUB_STORAGE_DEPLOY_BLOCK: u64 = 14_171_278;

/// Contract addresses the reader talks to on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain: ChainId,
    pub multicall: Address,
    /// Subscription registry. `None` until configured for networks without a built-in default.
    pub sub_storage: Option<Address>,
    /// First block worth scanning for registry events.
    pub deploy_block: u64,
}

impl NetworkConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin(chain: ChainId) -> Self {
        let (sub_storage, deploy_block) = match chain {
            ChainId::Mainnet => (Some(MAINNET_SUB_STORAGE), MAINNET_SUB_STORAGE_DEPLOY_BLOCK),
            ChainId::Optimism | ChainId::Arbitrum | ChainId::Base => (None, 0),
        };
        Self {
            chain,
            multicall: MULTICALL3_ADDRESS,
            sub_storage,
            deploy_block,
        }
    }

    /// Built-in defaults with `AUTOMATION_SUB_STORAGE_<NETWORK>` and
    /// `AUTOMATION_DEPLOY_BLOCK_<NETWORK>` applied on top.
    pub fn from_env(chain: ChainId) -> Self {
        let suffix = chain.env_suffix();
        let mut config = Self::builtin(chain);
        if let Some(addr) = env_var::<Address>(&format!("AUTOMATION_SUB_STORAGE_{}", suffix)) {
            config.sub_storage = Some(addr);
        }
        if let Some(block) = env_var::<u64>(&format!("AUTOMATION_DEPLOY_BLOCK_{}", suffix)) {
            config.deploy_block = block;
        }
        config
    }

    pub fn with_sub_storage(mut self, address: Address) -> Self {
        self.sub_storage = Some(address);
        self
    }

    pub fn with_deploy_block(mut self, block: u64) -> Self {
        self.deploy_block = block;
        self
    }
}
