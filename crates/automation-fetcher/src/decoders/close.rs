//! Close-on-price strategies.

use alloy_primitives::Address;
use automation_codec::numeric::{price_to_decimal, PRICE_DECIMALS};
use automation_codec::subdata::{
    AaveCloseSubData, LiquityCloseSubData, MakerCloseSubData, SubDataLayout,
};
use automation_codec::trigger::{decode_trigger, QuotePriceTrigger, TokenPriceTrigger};
use automation_codec::RatioState;
use automation_types::{is_stable_asset, ChainId, StrategyId};
use serde_json::Value;

use super::{address_value, fixed_value, uint_value, DecodeContext, DecodeResult, Decoded};
use crate::types::Subscription;

/// Ratio state as shown to users.
///
/// The trigger compares collateral priced in debt. When the collateral is a
/// stable asset and the debt is not, "over" on-chain means the debt asset
/// fell, so the sense is inverted for display.
pub fn displayed_state(
    chain: ChainId,
    raw: RatioState,
    coll_asset: Address,
    debt_asset: Address,
) -> RatioState {
    let coll_stable = is_stable_asset(chain, coll_asset);
    let debt_stable = is_stable_asset(chain, debt_asset);
    if coll_stable && !debt_stable {
        raw.inverse()
    } else {
        raw
    }
}

fn close_display(state: RatioState) -> StrategyId {
    match state {
        RatioState::Over => StrategyId::TakeProfit,
        RatioState::Under => StrategyId::StopLoss,
    }
}

fn state_value(state: RatioState) -> Value {
    Value::String(
        match state {
            RatioState::Over => "over",
            RatioState::Under => "under",
        }
        .to_string(),
    )
}

/// Aave V3 close-to-debt and close-to-collateral.
pub fn aave(
    sub: &Subscription,
    strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: QuotePriceTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = AaveCloseSubData::decode(&sub.sub_data)?;
    let state = displayed_state(
        ctx.chain,
        trigger.state()?,
        sub_data.coll_asset,
        sub_data.debt_asset,
    );
    let close_to = match strategy {
        StrategyId::CloseToCollateral => sub_data.coll_asset,
        _ => sub_data.debt_asset,
    };

    let mut decoded = Decoded::new(&trigger, &sub_data)?;
    decoded.set(
        "triggerPrice",
        fixed_value(trigger.price, PRICE_DECIMALS, |raw| price_to_decimal(raw, &ctx.format))?,
    );
    decoded.set("ratioState", state_value(state));
    decoded.set("collAsset", address_value(sub_data.coll_asset));
    decoded.set("collAssetId", sub_data.coll_asset_id);
    decoded.set("debtAsset", address_value(sub_data.debt_asset));
    decoded.set("debtAssetId", sub_data.debt_asset_id);
    decoded.set("closeToAsset", address_value(close_to));
    decoded.display_strategy = Some(close_display(state));
    Ok(decoded)
}

/// MakerDAO close-on-price-to-dai.
pub fn maker(
    sub: &Subscription,
    _strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TokenPriceTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = MakerCloseSubData::decode(&sub.sub_data)?;
    let mut decoded = Decoded::new(&trigger, &sub_data)?;
    decoded.set(
        "triggerPrice",
        fixed_value(trigger.price, PRICE_DECIMALS, |raw| price_to_decimal(raw, &ctx.format))?,
    );
    decoded.set("ratioState", state_value(trigger.state()?));
    decoded.set("vaultId", uint_value(sub_data.vault_id));
    decoded.set("token", address_value(trigger.token));
    Ok(decoded)
}

/// Liquity close-on-price-to-collateral.
pub fn liquity(
    sub: &Subscription,
    _strategy: StrategyId,
    ctx: &DecodeContext,
) -> DecodeResult<Decoded> {
    let trigger: TokenPriceTrigger = decode_trigger(&sub.trigger_data)?;
    let sub_data = LiquityCloseSubData::decode(&sub.sub_data)?;
    let mut decoded = Decoded::new(&trigger, &sub_data)?;
    decoded.set(
        "triggerPrice",
        fixed_value(trigger.price, PRICE_DECIMALS, |raw| price_to_decimal(raw, &ctx.format))?,
    );
    decoded.set("ratioState", state_value(trigger.state()?));
    decoded.set("token", address_value(trigger.token));
    decoded.set("closeToAsset", address_value(sub_data.close_to_asset));
    Ok(decoded)
}
