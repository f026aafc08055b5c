//! Mastery-weighted item selection.
//!
//! Two modes over the unlocked pool: practice selection, which keeps even
//! mastered items in rotation through a weight floor, and distractor
//! selection, which squares the mastery gap to bias harder toward unfamiliar
//! items. Both draw without replacement by walking cumulative weights over a
//! uniform draw, exactly once per slot.

use std::collections::HashSet;

use rand::Rng;

use crate::catalog::Item;
use crate::error::EngineError;
use crate::store::MasterySnapshot;

/// Weight floor keeps fully mastered items in the practice rotation.
const PRACTICE_WEIGHT_FLOOR: f64 = 0.3;
const PRACTICE_WEIGHT_SLOPE: f64 = 0.7;

/// Practice weight: 0.3 + 0.7 · (1 − mastery), bounded to [0.3, 1.0].
pub fn practice_weight(mastery: f64) -> f64 {
    PRACTICE_WEIGHT_FLOOR + PRACTICE_WEIGHT_SLOPE * (1.0 - mastery.clamp(0.0, 1.0))
}

/// Distractor weight: the mastery gap squared.
pub fn distractor_weight(mastery: f64) -> f64 {
    let gap = 1.0 - mastery.clamp(0.0, 1.0);
    gap * gap
}

/// One weighted draw over parallel weights. A zero (or degenerate) total
/// falls back to a uniform pick, so callers always get an index while any
/// candidate remains.
pub(crate) fn weighted_pick_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Some(rng.gen_range(0..weights.len()));
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative >= draw {
            return Some(index);
        }
    }
    // Float slack at the tail: the last candidate absorbs it.
    Some(weights.len() - 1)
}

/// Draw `count` practice items from the pool, favoring low mastery.
///
/// After the weighted draws, the mutually-exclusive variant-group invariant
/// is enforced by keeping only each group's first occurrence and backfilling
/// from non-conflicting unused items while capacity remains. The practice
/// weight floor keeps total weight positive, so the uniform fallback inside
/// the draw only matters for degenerate pools.
pub fn select_practice<R: Rng>(
    rng: &mut R,
    pool: &[Item],
    count: usize,
    snapshot: &MasterySnapshot,
) -> Result<Vec<Item>, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::NoContentAvailable);
    }

    let mut remaining: Vec<&Item> = pool.iter().collect();
    let mut picked: Vec<&Item> = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count && !remaining.is_empty() {
        let weights: Vec<f64> = remaining
            .iter()
            .map(|item| practice_weight(snapshot.get(&item.id)))
            .collect();
        match weighted_pick_index(rng, &weights) {
            Some(index) => picked.push(remaining.remove(index)),
            None => break,
        }
    }

    let mut seen_groups: HashSet<&str> = HashSet::new();
    let mut result: Vec<&Item> = Vec::with_capacity(picked.len());
    for item in picked {
        if let Some(group) = item.exclusion_group() {
            if !seen_groups.insert(group) {
                continue;
            }
        }
        result.push(item);
    }

    while result.len() < count {
        let candidates: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.exclusion_group()
                    .map(|group| !seen_groups.contains(group))
                    .unwrap_or(true)
            })
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            break;
        }
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&index| practice_weight(snapshot.get(&remaining[index].id)))
            .collect();
        let Some(pick) = weighted_pick_index(rng, &weights) else {
            break;
        };
        let item = remaining.remove(candidates[pick]);
        if let Some(group) = item.exclusion_group() {
            seen_groups.insert(group);
        }
        result.push(item);
    }

    Ok(result.into_iter().cloned().collect())
}

/// Draw `count` incorrect-option distractors, excluding the given ids.
///
/// The squared mastery gap biases distractors more strongly toward
/// unfamiliar items than practice selection does; when every candidate is
/// fully mastered the draw degrades to uniform random.
pub fn select_distractors<R: Rng>(
    rng: &mut R,
    pool: &[Item],
    exclude: &HashSet<String>,
    count: usize,
    snapshot: &MasterySnapshot,
) -> Result<Vec<Item>, EngineError> {
    let mut remaining: Vec<&Item> = pool
        .iter()
        .filter(|item| !exclude.contains(&item.id))
        .collect();
    if remaining.is_empty() {
        return Err(EngineError::NoEligibleItems);
    }

    let mut seen_groups: HashSet<&str> = HashSet::new();
    let mut result: Vec<&Item> = Vec::with_capacity(count.min(remaining.len()));
    while result.len() < count && !remaining.is_empty() {
        let candidates: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.exclusion_group()
                    .map(|group| !seen_groups.contains(group))
                    .unwrap_or(true)
            })
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            break;
        }
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&index| distractor_weight(snapshot.get(&remaining[index].id)))
            .collect();
        let Some(pick) = weighted_pick_index(rng, &weights) else {
            break;
        };
        let item = remaining.remove(candidates[pick]);
        if let Some(group) = item.exclusion_group() {
            seen_groups.insert(group);
        }
        result.push(item);
    }

    Ok(result.into_iter().cloned().collect())
}
