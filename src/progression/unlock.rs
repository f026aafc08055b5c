//! Unlock evaluation.
//!
//! A monotonic forward-only gate over the batch sequence: the first batch is
//! always open, and each subsequent batch opens only while every earlier gate
//! holds. Evaluation is recomputed from scratch on every call, a pure
//! function of (batches, snapshot) with no persisted unlock state, so it is
//! deterministic and idempotent.

use crate::progression::planner::Batch;
use crate::store::MasterySnapshot;

/// Category transitions require exact full mastery, not the batch threshold.
const FULL_MASTERY: f64 = 1.0;

/// Whether a batch opens its in-category successor: every item at or above
/// the threshold. Batches with no items never meet criteria.
pub fn meets_unlock_criteria(batch: &Batch, snapshot: &MasterySnapshot, threshold: f64) -> bool {
    !batch.items.is_empty()
        && batch
            .items
            .iter()
            .all(|item| snapshot.get(&item.id) >= threshold)
}

/// The currently accessible prefix of the batch sequence.
///
/// Walking i = 0..n-2 and stopping at the first failed gate: a same-category
/// successor needs batch i to meet the threshold criteria; a category
/// transition needs every item in all already-unlocked batches of batch i's
/// category at exactly full mastery.
pub fn unlocked_batches<'a>(
    batches: &'a [Batch],
    snapshot: &MasterySnapshot,
    threshold: f64,
) -> Vec<&'a Batch> {
    let mut unlocked: Vec<&Batch> = Vec::with_capacity(batches.len());
    let Some(first) = batches.first() else {
        return unlocked;
    };
    unlocked.push(first);

    for window in batches.windows(2) {
        let (current, next) = (&window[0], &window[1]);
        let gate_open = if current.category == next.category {
            meets_unlock_criteria(current, snapshot, threshold)
        } else {
            category_fully_mastered(&unlocked, current, snapshot)
        };
        if !gate_open {
            break;
        }
        unlocked.push(next);
    }

    unlocked
}

/// Every item exposed so far in the finishing category sits at exactly 1.0.
fn category_fully_mastered(unlocked: &[&Batch], current: &Batch, snapshot: &MasterySnapshot) -> bool {
    unlocked
        .iter()
        .filter(|batch| batch.category == current.category)
        .flat_map(|batch| batch.items.iter())
        .all(|item| snapshot.get(&item.id) >= FULL_MASTERY)
}
