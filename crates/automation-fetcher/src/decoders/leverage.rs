//! Repay/boost leverage management.
//!
//! Each leg is its own subscription. The repay leg is tagged as the primary
//! merge leg and the boost leg as the secondary, and both are displayed as
//! `leverage-management`. `specific` keys are prefixed with the leg name so
//! the two halves can be unioned without collisions.

use alloy_primitives::U256;
use automation_codec::numeric::{ratio_to_percent, RATIO_PERCENT_SCALE};
use automation_codec::subdata::{
    AaveLeverageSubData, CompoundLeverageSubData, LiquityLeverageSubData, MakerLeverageSubData,
    SubDataLayout,
};
use automation_codec::trigger::{
    decode_trigger, RatioTrigger, TroveRatioTrigger, VaultRatioTrigger,
};
use automation_types::StrategyId;
use serde::Serialize;

use super::{
    address_value, fixed_value, uint_value, DecodeContext, DecodeError, DecodeResult, Decoded,
};
use crate::types::{MergeLeg, Subscription};

struct Leg {
    merge_leg: MergeLeg,
    /// `Repay` / `Boost`, spliced into key names.
    key: &'static str,
    /// `repay` / `boost`.
    flag: &'static str,
}

fn leg_of(strategy: StrategyId) -> DecodeResult<Leg> {
    match strategy {
        StrategyId::Repay => Ok(Leg {
            merge_leg: MergeLeg::Primary,
            key: "Repay",
            flag: "repay",
        }),
        StrategyId::Boost => Ok(Leg {
            merge_leg: MergeLeg::Secondary,
            key: "Boost",
            flag: "boost",
        }),
        other => Err(DecodeError::UnexpectedStrategy(other)),
    }
}

fn leverage_decoded<T: Serialize, S: Serialize>(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
    trigger: &T,
    sub_data: &S,
    trigger_ratio: U256,
    target_ratio: U256,
) -> DecodeResult<Decoded> {
    let leg = leg_of(strategy)?;
    let mut decoded = Decoded::new(trigger, sub_data)?;
    decoded.set(
        format!("trigger{}Ratio", leg.key),
        fixed_value(trigger_ratio, RATIO_PERCENT_SCALE, |raw| ratio_to_percent(raw, &ctx.format))?,
    );
    decoded.set(
        format!("target{}Ratio", leg.key),
        fixed_value(target_ratio, RATIO_PERCENT_SCALE, |raw| ratio_to_percent(raw, &ctx.format))?,
    );
    decoded.set(format!("{}Enabled", leg.flag), sub.enabled);
    decoded.set(format!("{}SubId", leg.flag), sub.sub_id);
    decoded.display_strategy = Some(StrategyId::LeverageManagement);
    decoded.merge_leg = Some(leg.merge_leg);
    Ok(decoded)
}

/// Aave V3 and Spark.
pub fn aave(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: RatioTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = AaveLeverageSubData::decode(&sub.sub_data)?;
    let mut decoded = leverage_decoded(
        sub,
        strategy,
        ctx,
        &trigger,
        &sub_data,
        trigger.ratio,
        sub_data.target_ratio,
    )?;
    decoded.set("market", address_value(trigger.market));
    Ok(decoded)
}

pub fn compound(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: RatioTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = CompoundLeverageSubData::decode(&sub.sub_data)?;
    let mut decoded = leverage_decoded(
        sub,
        strategy,
        ctx,
        &trigger,
        &sub_data,
        trigger.ratio,
        sub_data.target_ratio,
    )?;
    decoded.set("market", address_value(sub_data.market));
    decoded.set("baseToken", address_value(sub_data.base_token));
    Ok(decoded)
}

pub fn maker(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: VaultRatioTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = MakerLeverageSubData::decode(&sub.sub_data)?;
    let mut decoded = leverage_decoded(
        sub,
        strategy,
        ctx,
        &trigger,
        &sub_data,
        trigger.ratio,
        sub_data.target_ratio,
    )?;
    decoded.set("vaultId", uint_value(sub_data.vault_id));
    Ok(decoded)
}

pub fn liquity(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TroveRatioTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = LiquityLeverageSubData::decode(&sub.sub_data)?;
    let mut decoded = leverage_decoded(
        sub,
        strategy,
        ctx,
        &trigger,
        &sub_data,
        trigger.ratio,
        sub_data.target_ratio,
    )?;
    decoded.set("troveOwner", address_value(trigger.troveOwner));
    Ok(decoded)
}
