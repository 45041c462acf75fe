//! Per-strategy decoders.
//!
//! Every `(protocol, strategy)` pair in the static identity table has exactly
//! one decoder here. A decoder reads the raw trigger/subData payload through
//! the codec crate and returns a [`Decoded`] record; it never mutates the base
//! [`Position`](crate::Position).

pub mod close;
pub mod exchange;
pub mod leverage;
pub mod trailing;

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use automation_codec::numeric::fixed_to_string;
use automation_codec::{CodecError, CodecResult, NumericFormat};
use automation_types::{ChainId, ProtocolId, StrategyId};
use chrono::{DateTime, SecondsFormat};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::types::{MergeLeg, Subscription};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to render decoded payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{what} value {value} is out of range")]
    OutOfRange { what: &'static str, value: String },

    #[error("decoder does not handle strategy {0}")]
    UnexpectedStrategy(StrategyId),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Chain-level inputs every decoder may need.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub chain: ChainId,
    pub format: NumericFormat,
}

/// Everything a decoder contributes on top of the base position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    pub trigger: Value,
    pub sub_data: Value,
    pub specific: BTreeMap<String, Value>,
    /// Display-only strategy id replacing the raw one.
    pub display_strategy: Option<StrategyId>,
    pub merge_leg: Option<MergeLeg>,
}

impl Decoded {
    pub fn new<T: Serialize, S: Serialize>(trigger: &T, sub_data: &S) -> DecodeResult<Self> {
        Ok(Self {
            trigger: serde_json::to_value(trigger)?,
            sub_data: serde_json::to_value(sub_data)?,
            ..Self::default()
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.specific.insert(key.into(), value.into());
    }
}

/// Receives the raw (table) strategy id, before any display override.
pub type Decoder = fn(&Subscription, StrategyId, &DecodeContext) -> DecodeResult<Decoded>;

/// Resolve the decoder for an identity from the static table.
///
/// `None` means the identity table and this match have drifted apart.
pub fn resolve_decoder(protocol: ProtocolId, strategy: StrategyId) -> Option<Decoder> {
    use ProtocolId::*;
    use StrategyId::*;

    let decoder: Decoder = match (protocol, strategy) {
        (AaveV3 | Spark, Repay | Boost) => leverage::aave,
        (CompoundV3, Repay | Boost) => leverage::compound,
        (MakerDao, Repay | Boost) => leverage::maker,
        (Liquity, Repay | Boost) => leverage::liquity,
        (AaveV3, CloseToDebt | CloseToCollateral) => close::aave,
        (MakerDao, CloseOnPriceToDai) => close::maker,
        (Liquity, CloseOnPriceToCollateral) => close::liquity,
        (MakerDao, TrailingStopToCollateral) => trailing::maker,
        (Liquity, TrailingStopToCollateral) => trailing::liquity,
        (Exchange, Dca) => exchange::dca,
        (Exchange, LimitOrder) => exchange::limit_order,
        _ => return None,
    };
    Some(decoder)
}

/// Decimal as a JSON number when the number carries every digit, a string otherwise.
pub(crate) fn decimal_value(value: Decimal) -> Value {
    if value.fract().is_zero() {
        if let Some(int) = value.to_i64() {
            return Value::from(int);
        }
    }
    value
        .to_f64()
        .filter(|float| float.to_string().parse::<Decimal>().ok() == Some(value))
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

/// Fixed-point conversion rendered as JSON.
///
/// Raw values past `Decimal` range keep their exact, unrounded decimal string.
pub(crate) fn fixed_value(
    raw: U256,
    scale: u32,
    convert: impl FnOnce(U256) -> CodecResult<Decimal>,
) -> DecodeResult<Value> {
    match convert(raw) {
        Ok(value) => Ok(decimal_value(value)),
        Err(CodecError::DecimalOverflow { .. }) => {
            Ok(Value::String(fixed_to_string(raw, scale)))
        }
        Err(err) => Err(err.into()),
    }
}

/// Token amounts and ids: a JSON number when it fits, a decimal string otherwise.
pub(crate) fn uint_value(value: U256) -> Value {
    match u64::try_from(value) {
        Ok(small) => Value::from(small),
        Err(_) => Value::String(value.to_string()),
    }
}

pub(crate) fn address_value(address: Address) -> Value {
    Value::String(address.to_checksum(None))
}

pub(crate) fn to_u64(value: U256, what: &'static str) -> DecodeResult<u64> {
    u64::try_from(value).map_err(|_| DecodeError::OutOfRange {
        what,
        value: value.to_string(),
    })
}

/// Unix seconds → RFC 3339 (UTC, second precision).
pub(crate) fn rfc3339(seconds: u64, what: &'static str) -> DecodeResult<String> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| DecodeError::OutOfRange {
            what,
            value: seconds.to_string(),
        })
}
