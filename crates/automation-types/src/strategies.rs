//! Static strategy/bundle identity registry.
//!
//! Subscriptions only carry `(strategyOrBundleId, isBundle)`. This table maps
//! those numeric ids, per chain, to the protocol and strategy they implement.
//! It is versioned alongside on-chain deployments: ids missing here are
//! strategies this client does not know yet, and callers drop them.
//!
//! The table is flattened into a `HashMap` on first use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::chain::ChainId;
use crate::ids::{ProtocolId, StrategyId};
use ProtocolId::*;
use StrategyId::*;

/// Resolved identity of a numeric strategy or bundle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyEntry {
    pub protocol: ProtocolId,
    pub strategy: StrategyId,
}

type Row = (u64, ProtocolId, StrategyId);

const MAINNET_BUNDLES: &[Row] = &[
    (0, MakerDao, Repay),
    (1, MakerDao, Boost),
    (2, Liquity, Repay),
    (3, Liquity, Boost),
    (4, AaveV3, Repay),
    (5, AaveV3, Boost),
    (6, CompoundV3, Repay),
    (7, CompoundV3, Boost),
    (8, Spark, Repay),
    (9, Spark, Boost),
    (10, AaveV3, CloseToDebt),
    (11, AaveV3, CloseToCollateral),
];

const MAINNET_STRATEGIES: &[Row] = &[
    (7, MakerDao, CloseOnPriceToDai),
    (10, Liquity, CloseOnPriceToCollateral),
    (13, MakerDao, TrailingStopToCollateral),
    (14, Liquity, TrailingStopToCollateral),
    (46, Exchange, Dca),
    (51, Exchange, LimitOrder),
];

const OPTIMISM_BUNDLES: &[Row] = &[
    (0, AaveV3, Repay),
    (1, AaveV3, Boost),
    (2, AaveV3, CloseToDebt),
    (3, AaveV3, CloseToCollateral),
];

const OPTIMISM_STRATEGIES: &[Row] = &[(8, Exchange, Dca), (9, Exchange, LimitOrder)];

const ARBITRUM_BUNDLES: &[Row] = &[
    (0, AaveV3, Repay),
    (1, AaveV3, Boost),
    (2, CompoundV3, Repay),
    (3, CompoundV3, Boost),
    (4, AaveV3, CloseToDebt),
    (5, AaveV3, CloseToCollateral),
];

const ARBITRUM_STRATEGIES: &[Row] = &[(10, Exchange, Dca), (11, Exchange, LimitOrder)];

const BASE_BUNDLES: &[Row] = &[
    (0, AaveV3, Repay),
    (1, AaveV3, Boost),
    (2, CompoundV3, Repay),
    (3, CompoundV3, Boost),
    (4, AaveV3, CloseToDebt),
    (5, AaveV3, CloseToCollateral),
];

const BASE_STRATEGIES: &[Row] = &[(8, Exchange, Dca), (9, Exchange, LimitOrder)];

fn tables(chain: ChainId) -> (&'static [Row], &'static [Row]) {
    match chain {
        ChainId::Mainnet => (MAINNET_STRATEGIES, MAINNET_BUNDLES),
        ChainId::Optimism => (OPTIMISM_STRATEGIES, OPTIMISM_BUNDLES),
        ChainId::Arbitrum => (ARBITRUM_STRATEGIES, ARBITRUM_BUNDLES),
        ChainId::Base => (BASE_STRATEGIES, BASE_BUNDLES),
    }
}

static REGISTRY: LazyLock<HashMap<(ChainId, bool, u64), StrategyEntry>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for chain in ChainId::ALL {
        let (strategies, bundles) = tables(chain);
        for (is_bundle, rows) in [(false, strategies), (true, bundles)] {
            for &(id, protocol, strategy) in rows {
                map.insert((chain, is_bundle, id), StrategyEntry { protocol, strategy });
            }
        }
    }
    map
});

/// Resolve a numeric id to its protocol/strategy identity.
///
/// Returns `None` for ids this client does not know.
pub fn lookup_strategy(chain: ChainId, is_bundle: bool, id: u64) -> Option<StrategyEntry> {
    REGISTRY.get(&(chain, is_bundle, id)).copied()
}

/// Every `(chain, isBundle, id, entry)` row in the table, in no particular order.
pub fn all_entries() -> impl Iterator<Item = (ChainId, bool, u64, StrategyEntry)> {
    REGISTRY
        .iter()
        .map(|(&(chain, is_bundle, id), &entry)| (chain, is_bundle, id, entry))
}
