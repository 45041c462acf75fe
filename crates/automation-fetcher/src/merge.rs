//! Merge engine for compound (repay + boost) positions.
//!
//! Legs are paired positionally within a `positionId` cohort: the i-th primary
//! leg (by `subId`) with the i-th secondary leg. There is no on-chain
//! cross-reference between the two halves, so this relies on both legs of a
//! position being registered in matching relative order.

use std::collections::HashMap;

use crate::types::{MergeLeg, Position};

/// Combine complementary legs. Input order is kept: a merged position takes
/// its primary leg's slot, consumed secondary legs disappear, and every other
/// position passes through with a single-element `subIds`.
pub fn merge_positions(positions: Vec<Position>) -> Vec<Position> {
    // cohort -> (primary slots, secondary slots), each in ascending subId
    let mut cohorts: HashMap<&str, (Vec<usize>, Vec<usize>)> = HashMap::new();
    for (slot, position) in positions.iter().enumerate() {
        let legs = cohorts.entry(position.position_id.as_str()).or_default();
        match position.merge_leg {
            Some(MergeLeg::Primary) => legs.0.push(slot),
            Some(MergeLeg::Secondary) => legs.1.push(slot),
            None => {}
        }
    }

    // primary slot -> secondary slot
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (mut primaries, mut secondaries) in cohorts.into_values() {
        primaries.sort_by_key(|&slot| positions[slot].sub_id);
        secondaries.sort_by_key(|&slot| positions[slot].sub_id);
        pairs.extend(primaries.into_iter().zip(secondaries));
    }

    let mut slots: Vec<Option<Position>> = positions.into_iter().map(Some).collect();
    // secondaries leave their own slot before the pass
    let mut partners: HashMap<usize, Position> = pairs
        .into_iter()
        .filter_map(|(primary, secondary)| Some((primary, slots[secondary].take()?)))
        .collect();

    slots
        .into_iter()
        .enumerate()
        .filter_map(|(slot, position)| {
            let position = position?;
            Some(match partners.remove(&slot) {
                Some(secondary) => combine(position, secondary),
                None => solo(position),
            })
        })
        .collect()
}

fn combine(primary: Position, mut secondary: Position) -> Position {
    let mut specific = primary.specific;
    specific.append(&mut secondary.specific);
    Position {
        sub_ids: Some(vec![primary.sub_id, secondary.sub_id]),
        specific,
        merge_leg: None,
        ..secondary
    }
}

fn solo(mut position: Position) -> Position {
    position.sub_ids = Some(vec![position.sub_id]);
    position.merge_leg = None;
    position
}
