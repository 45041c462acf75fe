//! subData layouts, one per strategy family.
//!
//! Each word is `abi.encode` of one static value; see [`crate::words`].

use alloy_primitives::{Address, B256, U256};
use serde::Serialize;

use crate::error::CodecResult;
use crate::trigger::RatioState;
use crate::words::{
    address_word, bool_word, read_address, read_bool, read_u16, read_u256, read_u8, small_word,
    u256_word,
};

/// A fixed subData word layout.
pub trait SubDataLayout: Sized {
    fn decode(words: &[B256]) -> CodecResult<Self>;
    fn encode(&self) -> Vec<B256>;
}

fn read_state(words: &[B256], index: usize) -> CodecResult<RatioState> {
    RatioState::try_from(read_u8(words, index)?)
}

fn state_word(state: RatioState) -> B256 {
    small_word(state.as_u8() as u64)
}

/// Aave V3 and Spark repay/boost: `[targetRatio, ratioState, useDefaultMarket, useOnBehalf]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AaveLeverageSubData {
    pub target_ratio: U256,
    pub ratio_state: RatioState,
    pub use_default_market: bool,
    pub use_on_behalf: bool,
}

impl SubDataLayout for AaveLeverageSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            target_ratio: read_u256(words, 0)?,
            ratio_state: read_state(words, 1)?,
            use_default_market: read_bool(words, 2)?,
            use_on_behalf: read_bool(words, 3)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            u256_word(self.target_ratio),
            state_word(self.ratio_state),
            bool_word(self.use_default_market),
            bool_word(self.use_on_behalf),
        ]
    }
}

/// Compound V3 repay/boost: `[market, baseToken, targetRatio, ratioState]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundLeverageSubData {
    pub market: Address,
    pub base_token: Address,
    pub target_ratio: U256,
    pub ratio_state: RatioState,
}

impl SubDataLayout for CompoundLeverageSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            market: read_address(words, 0)?,
            base_token: read_address(words, 1)?,
            target_ratio: read_u256(words, 2)?,
            ratio_state: read_state(words, 3)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            address_word(self.market),
            address_word(self.base_token),
            u256_word(self.target_ratio),
            state_word(self.ratio_state),
        ]
    }
}

/// MakerDAO repay/boost: `[vaultId, targetRatio, daiAddr]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerLeverageSubData {
    pub vault_id: U256,
    pub target_ratio: U256,
    pub dai_addr: Address,
}

impl SubDataLayout for MakerLeverageSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            vault_id: read_u256(words, 0)?,
            target_ratio: read_u256(words, 1)?,
            dai_addr: read_address(words, 2)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            u256_word(self.vault_id),
            u256_word(self.target_ratio),
            address_word(self.dai_addr),
        ]
    }
}

/// Liquity repay/boost: `[targetRatio, ratioState]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquityLeverageSubData {
    pub target_ratio: U256,
    pub ratio_state: RatioState,
}

impl SubDataLayout for LiquityLeverageSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            target_ratio: read_u256(words, 0)?,
            ratio_state: read_state(words, 1)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![u256_word(self.target_ratio), state_word(self.ratio_state)]
    }
}

/// Aave V3 close-on-price: `[collAsset, collAssetId, debtAsset, debtAssetId]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AaveCloseSubData {
    pub coll_asset: Address,
    pub coll_asset_id: u16,
    pub debt_asset: Address,
    pub debt_asset_id: u16,
}

impl SubDataLayout for AaveCloseSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            coll_asset: read_address(words, 0)?,
            coll_asset_id: read_u16(words, 1)?,
            debt_asset: read_address(words, 2)?,
            debt_asset_id: read_u16(words, 3)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            address_word(self.coll_asset),
            small_word(self.coll_asset_id as u64),
            address_word(self.debt_asset),
            small_word(self.debt_asset_id as u64),
        ]
    }
}

/// MakerDAO close-on-price-to-dai: `[vaultId, daiAddr]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerCloseSubData {
    pub vault_id: U256,
    pub dai_addr: Address,
}

impl SubDataLayout for MakerCloseSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            vault_id: read_u256(words, 0)?,
            dai_addr: read_address(words, 1)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![u256_word(self.vault_id), address_word(self.dai_addr)]
    }
}

/// Liquity close-on-price-to-collateral: `[closeToAsset]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquityCloseSubData {
    pub close_to_asset: Address,
}

impl SubDataLayout for LiquityCloseSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            close_to_asset: read_address(words, 0)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![address_word(self.close_to_asset)]
    }
}

/// MakerDAO trailing stop: `[vaultId]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerTrailingStopSubData {
    pub vault_id: U256,
}

impl SubDataLayout for MakerTrailingStopSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            vault_id: read_u256(words, 0)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![u256_word(self.vault_id)]
    }
}

/// Liquity trailing stop: `[troveOwner]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquityTrailingStopSubData {
    pub trove_owner: Address,
}

impl SubDataLayout for LiquityTrailingStopSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            trove_owner: read_address(words, 0)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![address_word(self.trove_owner)]
    }
}

/// Exchange DCA: `[fromToken, toToken, amount, interval]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaSubData {
    pub from_token: Address,
    pub to_token: Address,
    pub amount: U256,
    pub interval: U256,
}

impl SubDataLayout for DcaSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            from_token: read_address(words, 0)?,
            to_token: read_address(words, 1)?,
            amount: read_u256(words, 2)?,
            interval: read_u256(words, 3)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            address_word(self.from_token),
            address_word(self.to_token),
            u256_word(self.amount),
            u256_word(self.interval),
        ]
    }
}

/// Exchange limit order: `[fromToken, toToken, amount]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderSubData {
    pub from_token: Address,
    pub to_token: Address,
    pub amount: U256,
}

impl SubDataLayout for LimitOrderSubData {
    fn decode(words: &[B256]) -> CodecResult<Self> {
        Ok(Self {
            from_token: read_address(words, 0)?,
            to_token: read_address(words, 1)?,
            amount: read_u256(words, 2)?,
        })
    }

    fn encode(&self) -> Vec<B256> {
        vec![
            address_word(self.from_token),
            address_word(self.to_token),
            u256_word(self.amount),
        ]
    }
}
