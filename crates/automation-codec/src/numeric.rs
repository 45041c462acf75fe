//! Fixed-point → decimal conversion.
//!
//! On-chain values are integers with an implied scale (ratios are 1e18 = 100%,
//! Chainlink prices carry 8 decimals). Every conversion takes an explicit
//! [`NumericFormat`] so the rounding mode and displayed precision travel with
//! the call instead of living in process-wide state.

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Ratio fixed-point scale: 1e18 = 100%, so percent = raw / 1e16.
pub const RATIO_PERCENT_SCALE: u32 = 16;
/// Chainlink-style price/percentage decimals.
pub const PRICE_DECIMALS: u32 = 8;
/// Limit order price decimals.
pub const LIMIT_PRICE_DECIMALS: u32 = 18;

/// Rounding direction for displayed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    #[default]
    Down,
    Up,
    HalfUp,
    HalfEven,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::Down => RoundingStrategy::ToZero,
            Rounding::Up => RoundingStrategy::AwayFromZero,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Display precision and rounding applied by every decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFormat {
    /// Decimal places kept for percentages.
    pub ratio_decimals: u32,
    /// Decimal places kept for prices.
    pub price_decimals: u32,
    pub rounding: Rounding,
}

impl Default for NumericFormat {
    fn default() -> Self {
        Self {
            ratio_decimals: 2,
            price_decimals: 8,
            rounding: Rounding::Down,
        }
    }
}

impl NumericFormat {
    /// Round to `dp` places with this format's rounding, trailing zeros stripped.
    pub fn round(&self, value: Decimal, dp: u32) -> Decimal {
        value
            .round_dp_with_strategy(dp, self.rounding.strategy())
            .normalize()
    }
}

/// Interpret `raw` as a fixed-point number with `scale` implied decimals.
pub fn fixed_to_decimal(raw: U256, scale: u32) -> CodecResult<Decimal> {
    let overflow = || CodecError::DecimalOverflow {
        value: raw.to_string(),
        scale,
    };
    let int = i128::try_from(raw).map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(int, scale).map_err(|_| overflow())
}

/// Exact decimal rendering of a fixed-point value, trailing zeros stripped.
///
/// Unlike [`fixed_to_decimal`] this covers the whole `uint256` range and never rounds.
pub fn fixed_to_string(raw: U256, scale: u32) -> String {
    let digits = raw.to_string();
    let scale = scale as usize;
    if scale == 0 {
        return digits;
    }
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int, frac) = padded.split_at(padded.len() - scale);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    }
}

/// 1e18-based ratio → percentage, e.g. `1.85e18` → `185`.
pub fn ratio_to_percent(raw: U256, fmt: &NumericFormat) -> CodecResult<Decimal> {
    Ok(fmt.round(fixed_to_decimal(raw, RATIO_PERCENT_SCALE)?, fmt.ratio_decimals))
}

/// 8-decimal Chainlink price → decimal price.
pub fn price_to_decimal(raw: U256, fmt: &NumericFormat) -> CodecResult<Decimal> {
    Ok(fmt.round(fixed_to_decimal(raw, PRICE_DECIMALS)?, fmt.price_decimals))
}

/// 8-decimal percentage (trailing stop distance) → percentage.
pub fn trailing_to_percent(raw: U256, fmt: &NumericFormat) -> CodecResult<Decimal> {
    Ok(fmt.round(fixed_to_decimal(raw, PRICE_DECIMALS)?, fmt.ratio_decimals))
}

/// 18-decimal limit price → decimal price.
pub fn limit_price_to_decimal(raw: U256, fmt: &NumericFormat) -> CodecResult<Decimal> {
    Ok(fmt.round(
        fixed_to_decimal(raw, LIMIT_PRICE_DECIMALS)?,
        fmt.price_decimals,
    ))
}

/// Inverse of [`fixed_to_decimal`], truncating anything below the scale.
pub fn decimal_to_fixed(value: Decimal, scale: u32) -> CodecResult<U256> {
    let overflow = || CodecError::DecimalOverflow {
        value: value.to_string(),
        scale,
    };
    let mut scaled = value.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    for _ in 0..scale {
        scaled = scaled.checked_mul(Decimal::TEN).ok_or_else(overflow)?;
    }
    let int = scaled.trunc().to_u128().ok_or_else(overflow)?;
    Ok(U256::from(int))
}

/// Percentage → 1e18-based ratio, e.g. `120` → `1.2e18`.
pub fn percent_to_ratio(percent: Decimal) -> CodecResult<U256> {
    decimal_to_fixed(percent, RATIO_PERCENT_SCALE)
}
