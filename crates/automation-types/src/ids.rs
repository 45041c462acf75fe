//! Protocol and strategy identities.
//!
//! Numeric ids on-chain are meaningless without a per-chain table (see
//! [`crate::strategies`]); these enums are what the table resolves to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lending/trading protocol an automation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtocolId {
    AaveV3,
    CompoundV3,
    Spark,
    MakerDao,
    Liquity,
    Exchange,
}

impl ProtocolId {
    /// Display name without version.
    pub const fn name(self) -> &'static str {
        match self {
            ProtocolId::AaveV3 => "Aave",
            ProtocolId::CompoundV3 => "Compound",
            ProtocolId::Spark => "Spark",
            ProtocolId::MakerDao => "MakerDAO",
            ProtocolId::Liquity => "Liquity",
            ProtocolId::Exchange => "Exchange",
        }
    }

    /// Stable lower-case slug, used in derived position ids.
    pub const fn slug(self) -> &'static str {
        match self {
            ProtocolId::AaveV3 => "aave",
            ProtocolId::CompoundV3 => "compound",
            ProtocolId::Spark => "spark",
            ProtocolId::MakerDao => "maker",
            ProtocolId::Liquity => "liquity",
            ProtocolId::Exchange => "exchange",
        }
    }

    pub const fn version(self) -> Option<&'static str> {
        match self {
            ProtocolId::AaveV3 | ProtocolId::CompoundV3 => Some("V3"),
            _ => None,
        }
    }

    /// Full human-readable id, e.g. "Aave__V3".
    pub fn full_id(self) -> String {
        match self.version() {
            Some(version) => format!("{}__{}", self.name(), version),
            None => self.name().to_string(),
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_id())
    }
}

/// Strategy identifier.
///
/// The first group are the raw identities found in the static table. The
/// last three are display-only overrides a decoder may substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    Repay,
    Boost,
    CloseToDebt,
    CloseToCollateral,
    CloseOnPriceToDai,
    CloseOnPriceToCollateral,
    TrailingStopToCollateral,
    Dca,
    LimitOrder,
    // display overrides
    LeverageManagement,
    TakeProfit,
    StopLoss,
}

impl StrategyId {
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyId::Repay => "repay",
            StrategyId::Boost => "boost",
            StrategyId::CloseToDebt => "close-to-debt",
            StrategyId::CloseToCollateral => "close-to-collateral",
            StrategyId::CloseOnPriceToDai => "close-on-price-to-dai",
            StrategyId::CloseOnPriceToCollateral => "close-on-price-to-collateral",
            StrategyId::TrailingStopToCollateral => "trailing-stop-to-collateral",
            StrategyId::Dca => "dca",
            StrategyId::LimitOrder => "limit-order",
            StrategyId::LeverageManagement => "leverage-management",
            StrategyId::TakeProfit => "take-profit",
            StrategyId::StopLoss => "stop-loss",
        }
    }

    pub const fn is_display_override(self) -> bool {
        matches!(
            self,
            StrategyId::LeverageManagement | StrategyId::TakeProfit | StrategyId::StopLoss
        )
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
