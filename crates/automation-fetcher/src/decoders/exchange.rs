//! Protocol-less swap automations: DCA and limit orders.

use automation_codec::numeric::{limit_price_to_decimal, LIMIT_PRICE_DECIMALS};
use automation_codec::subdata::{DcaSubData, LimitOrderSubData, SubDataLayout};
use automation_codec::trigger::{decode_trigger, OffchainPriceTrigger, TimestampTrigger};
use automation_types::StrategyId;

use super::{
    address_value, fixed_value, rfc3339, to_u64, uint_value, DecodeContext, DecodeResult,
    Decoded,
};
use crate::types::Subscription;

pub fn dca(
    sub: &Subscription,
    _strategy: StrategyId,
    _ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TimestampTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = DcaSubData::decode(&sub.sub_data)?;
    let start = to_u64(trigger.startTimestamp, "startTimestamp")?;

    let mut decoded = Decoded::new(&trigger, &sub_data)?;
    decoded.set("fromToken", address_value(sub_data.from_token));
    decoded.set("toToken", address_value(sub_data.to_token));
    decoded.set("amount", uint_value(sub_data.amount));
    decoded.set("interval", uint_value(sub_data.interval));
    decoded.set("startDate", rfc3339(start, "startTimestamp")?);
    Ok(decoded)
}

pub fn limit_order(
    sub: &Subscription,
    _strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: OffchainPriceTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = LimitOrderSubData::decode(&sub.sub_data)?;
    let good_until = to_u64(trigger.goodUntil, "goodUntil")?;
    let order_type = trigger.order_type()?;

    let mut decoded = Decoded::new(&trigger, &sub_data)?;
    decoded.set("fromToken", address_value(sub_data.from_token));
    decoded.set("toToken", address_value(sub_data.to_token));
    decoded.set("amount", uint_value(sub_data.amount));
    decoded.set(
        "limitPrice",
        fixed_value(trigger.limitPrice, LIMIT_PRICE_DECIMALS, |raw| {
            limit_price_to_decimal(raw, &ctx.format)
        })?,
    );
    decoded.set("goodUntil", good_until);
    decoded.set("goodUntilDate", rfc3339(good_until, "goodUntil")?);
    decoded.set("orderType", serde_json::to_value(order_type)?);
    Ok(decoded)
}

/// `true` when a limit order's expiry lies before `now` (unix seconds).
pub fn is_expired(good_until: u64, now: u64) -> bool {
    good_until < now
}
