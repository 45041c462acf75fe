//! Trailing stop to collateral.

use automation_codec::numeric::{trailing_to_percent, PRICE_DECIMALS};
use automation_codec::subdata::{
    LiquityTrailingStopSubData, MakerTrailingStopSubData, SubDataLayout,
};
use automation_codec::trigger::{decode_trigger, TrailingStopTrigger};
use automation_types::StrategyId;
use serde_json::Value;

use super::{address_value, fixed_value, uint_value, DecodeContext, DecodeResult, Decoded};
use crate::types::Subscription;

fn trailing_decoded<S: serde::Serialize>(
    trigger: &TrailingStopTrigger,
    sub_data: &S,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let mut decoded = Decoded::new(trigger, sub_data)?;
    decoded.set(
        "triggerPercentage",
        fixed_value(trigger.percentage, PRICE_DECIMALS, |raw| {
            trailing_to_percent(raw, &ctx.format)
        })?,
    );
    // Chainlink round ids routinely exceed u64
    decoded.set("roundId", Value::String(trigger.roundId.to_string()));
    decoded.set("token", address_value(trigger.token));
    Ok(decoded)
}

pub fn maker(
    sub: &Subscription,
    _strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TrailingStopTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = MakerTrailingStopSubData::decode(&sub.sub_data)?;
    let mut decoded = trailing_decoded(&trigger, &sub_data, ctx)?;
    decoded.set("vaultId", uint_value(sub_data.vault_id));
    Ok(decoded)
}

pub fn liquity(
    sub: &Subscription,
    _strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TrailingStopTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = LiquityTrailingStopSubData::decode(&sub.sub_data)?;
    let mut decoded = trailing_decoded(&trigger, &sub_data, ctx)?;
    decoded.set("troveOwner", address_value(sub_data.trove_owner));
    Ok(decoded)
}
