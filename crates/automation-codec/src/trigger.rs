//! Trigger payload layouts.
//!
//! A subscription's `triggerData` is a `bytes[]`; every strategy we read uses a
//! single trigger whose bytes are `abi.encode(...)` of a static parameter
//! tuple. Each tuple is declared once below and decoded with [`decode_trigger`].

use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolType};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

sol! {
    /// Aave V3 / Spark / Compound V3 position ratio trigger.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct RatioTrigger {
        address owner;
        address market;
        uint256 ratio;
        uint8 ratioState;
    }

    /// MakerDAO vault ratio trigger.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct VaultRatioTrigger {
        uint256 vaultId;
        uint256 ratio;
        uint8 ratioState;
    }

    /// Liquity trove ratio trigger.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct TroveRatioTrigger {
        address troveOwner;
        uint256 ratio;
        uint8 ratioState;
    }

    /// Price of `baseToken` quoted in `quoteToken` (Aave V3 close).
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct QuotePriceTrigger {
        address baseToken;
        address quoteToken;
        uint256 price;
        uint8 ratioState;
    }

    /// USD price of a single token (Maker / Liquity close).
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct TokenPriceTrigger {
        address token;
        uint256 price;
        uint8 ratioState;
    }

    /// Trailing stop measured from the Chainlink round `roundId`.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct TrailingStopTrigger {
        address token;
        uint256 percentage;
        uint80 roundId;
    }

    /// Recurring swap schedule.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct TimestampTrigger {
        uint256 startTimestamp;
        uint256 interval;
    }

    /// Off-chain priced limit order.
    #[derive(Debug, PartialEq, Eq, Serialize)]
    struct OffchainPriceTrigger {
        uint256 limitPrice;
        uint256 goodUntil;
        uint8 orderType;
    }
}

/// Decode the first trigger of `trigger_data` as `T`.
pub fn decode_trigger<T>(trigger_data: &[Bytes]) -> CodecResult<T>
where
    T: SolType<RustType = T>,
{
    let bytes = trigger_data.first().ok_or(CodecError::Missing {
        what: "triggerData entry",
        index: 0,
    })?;
    Ok(T::abi_decode(bytes)?)
}

/// Encode `trigger` as a single-element `triggerData`.
pub fn encode_trigger<T>(trigger: &T) -> Vec<Bytes>
where
    T: SolType<RustType = T> + alloy_sol_types::private::SolTypeValue<T>,
{
    vec![Bytes::from(T::abi_encode(trigger))]
}

/// Direction of a ratio or price comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioState {
    Over = 0,
    Under = 1,
}

impl RatioState {
    pub fn inverse(self) -> Self {
        match self {
            RatioState::Over => RatioState::Under,
            RatioState::Under => RatioState::Over,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RatioState {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RatioState::Over),
            1 => Ok(RatioState::Under),
            other => Err(CodecError::UnknownRatioState(other)),
        }
    }
}

/// Limit order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    TakeProfit = 0,
    StopLoss = 1,
}

impl TryFrom<u8> for OrderType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderType::TakeProfit),
            1 => Ok(OrderType::StopLoss),
            other => Err(CodecError::UnknownOrderType(other)),
        }
    }
}

impl RatioTrigger {
    pub fn state(&self) -> CodecResult<RatioState> {
        RatioState::try_from(self.ratioState)
    }
}

impl VaultRatioTrigger {
    pub fn state(&self) -> CodecResult<RatioState> {
        RatioState::try_from(self.ratioState)
    }
}

impl TroveRatioTrigger {
    pub fn state(&self) -> CodecResult<RatioState> {
        RatioState::try_from(self.ratioState)
    }
}

impl QuotePriceTrigger {
    pub fn state(&self) -> CodecResult<RatioState> {
        RatioState::try_from(self.ratioState)
    }
}

impl TokenPriceTrigger {
    pub fn state(&self) -> CodecResult<RatioState> {
        RatioState::try_from(self.ratioState)
    }
}

impl OffchainPriceTrigger {
    pub fn order_type(&self) -> CodecResult<OrderType> {
        OrderType::try_from(self.orderType)
    }
}
