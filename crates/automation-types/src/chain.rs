//! Supported networks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A network the automation registry is deployed on.
///
/// The four networks differ only in contract addresses and strategy ids;
/// the registry ABI and event layout are identical everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum ChainId {
    Mainnet,
    Optimism,
    Arbitrum,
    Base,
}

impl ChainId {
    pub const ALL: [ChainId; 4] = [
        ChainId::Mainnet,
        ChainId::Optimism,
        ChainId::Arbitrum,
        ChainId::Base,
    ];

    /// EIP-155 chain id.
    pub const fn id(self) -> u64 {
        match self {
            ChainId::Mainnet => 1,
            ChainId::Optimism => 10,
            ChainId::Arbitrum => 42161,
            ChainId::Base => 8453,
        }
    }

    /// Lower-case network name, also used as the CLI value.
    pub const fn name(self) -> &'static str {
        match self {
            ChainId::Mainnet => "mainnet",
            ChainId::Optimism => "optimism",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Base => "base",
        }
    }

    /// Upper-case suffix used by per-network environment overrides.
    pub fn env_suffix(self) -> String {
        self.name().to_uppercase()
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.id() == id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.id()
    }
}

impl TryFrom<u64> for ChainId {
    type Error = String;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        ChainId::from_id(id).ok_or_else(|| format!("unsupported chain id {id}"))
    }
}

impl FromStr for ChainId {
    type Err = String;

    /// Accepts a network name ("mainnet", "ethereum", "arbitrum", ...) or a numeric chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "mainnet" | "ethereum" | "eth" => Ok(ChainId::Mainnet),
            "optimism" | "op" => Ok(ChainId::Optimism),
            "arbitrum" | "arb" => Ok(ChainId::Arbitrum),
            "base" => Ok(ChainId::Base),
            other => match other.parse::<u64>() {
                Ok(id) => ChainId::try_from(id),
                Err(_) => Err(format!("unsupported network '{s}'")),
            },
        }
    }
}
