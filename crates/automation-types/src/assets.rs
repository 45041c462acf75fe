//! Stable/volatile asset classification.
//!
//! Close-on-price strategies are displayed as take-profit or stop-loss
//! depending on which side of the pair is a stablecoin, so decoders need a
//! per-chain list of stable assets. Anything not listed is volatile.

use alloy_primitives::{address, Address};

use crate::chain::ChainId;

const MAINNET_STABLES: &[Address] = &[
    // USDC
    address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
    // USDT
    address!("dac17f958d2ee523a2206206994597c13d831ec7"),
    // DAI
    address!("6b175474e89094c44da98b954eedeac495271d0f"),
    // LUSD
    address!("5f98805a4e8be255a32880fdec7f6728c6568ba0"),
    // GHO
    address!("40d16fc0246ad3160ccc09b8d0d3a2cd28ae6c2f"),
];

const OPTIMISM_STABLES: &[Address] = &[
    // USDC
    address!("0b2c639c533813f4aa9d7837caf62653d097ff85"),
    // USDC.e
    address!("7f5c764cbc14f9669b88837ca1490cca17c31607"),
    // USDT
    address!("94b008aa00579c1307b0ef2c499ad98a8ce58e58"),
    // DAI
    address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1"),
];

const ARBITRUM_STABLES: &[Address] = &[
    // USDC
    address!("af88d065e77c8cc2239327c5edb3a432268e5831"),
    // USDC.e
    address!("ff970a61a04b1ca14834a43f5de4533ebddb5cc8"),
    // USDT
    address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"),
    // DAI
    address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1"),
];

const BASE_STABLES: &[Address] = &[
    // USDC
    address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
    // USDbC
    address!("d9aaec86b65d86f6a7b5b1b0c42ffa531710b6ca"),
    // DAI
    address!("50c5725949a6f0c72e6c4a641f24049a917db0cb"),
];

/// Stable assets known for `chain`.
pub fn stable_assets(chain: ChainId) -> &'static [Address] {
    match chain {
        ChainId::Mainnet => MAINNET_STABLES,
        ChainId::Optimism => OPTIMISM_STABLES,
        ChainId::Arbitrum => ARBITRUM_STABLES,
        ChainId::Base => BASE_STABLES,
    }
}

pub fn is_stable_asset(chain: ChainId, asset: Address) -> bool {
    stable_assets(chain).contains(&asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_classification_is_per_chain() {
        let usdc_mainnet = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert!(is_stable_asset(ChainId::Mainnet, usdc_mainnet));
        assert!(!is_stable_asset(ChainId::Base, usdc_mainnet));

        let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        assert!(!is_stable_asset(ChainId::Mainnet, weth));
    }
}
