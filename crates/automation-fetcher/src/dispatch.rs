//! Decode dispatcher: one reconciled [`Subscription`] in, one [`Position`] or a drop out.

use automation_types::lookup_strategy;
use tracing::debug;

use crate::decoders::{resolve_decoder, DecodeContext, Decoded};
use crate::error::AutomationError;
use crate::types::{DecodedData, Position, Subscription};

/// Decode `sub` into a position.
///
/// Returns `Ok(None)` when the strategy/bundle id is not in the identity table
/// for `ctx.chain`. A known id without a decoder, or a payload its decoder
/// rejects, fails the whole query.
pub fn dispatch(
    sub: &Subscription,
    ctx: &DecodeContext,
) -> Result<Option<Position>, AutomationError> {
    let Some(entry) = lookup_strategy(ctx.chain, sub.is_bundle, sub.strategy_or_bundle_id) else {
        debug!(
            chain_id = ctx.chain.id(),
            sub_id = sub.sub_id,
            id = sub.strategy_or_bundle_id,
            is_bundle = sub.is_bundle,
            "unknown strategy id, dropping subscription"
        );
        return Ok(None);
    };

    let decoder =
        resolve_decoder(entry.protocol, entry.strategy).ok_or(AutomationError::MissingDecoder {
            protocol: entry.protocol,
            strategy: entry.strategy,
        })?;

    let decoded = decoder(sub, entry.strategy, ctx).map_err(|source| AutomationError::Codec {
        sub_id: sub.sub_id,
        source,
    })?;

    let base = Position::base(sub, ctx.chain, entry.protocol, entry.strategy);
    Ok(Some(apply(base, decoded)))
}

/// Decode a whole batch, preserving input order and skipping drops.
pub fn dispatch_all(
    subs: &[Subscription],
    ctx: &DecodeContext,
) -> Result<Vec<Position>, AutomationError> {
    let mut positions = Vec::with_capacity(subs.len());
    for sub in subs {
        if let Some(position) = dispatch(sub, ctx)? {
            positions.push(position);
        }
    }
    Ok(positions)
}

fn apply(mut position: Position, decoded: Decoded) -> Position {
    position.strategy_data.decoded = DecodedData {
        trigger: decoded.trigger,
        sub_data: decoded.sub_data,
    };
    position.specific = decoded.specific;
    if let Some(display) = decoded.display_strategy {
        position.strategy.strategy_id = display;
    }
    position.merge_leg = decoded.merge_leg;
    position
}
