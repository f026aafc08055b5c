//! Near-miss syllable generation.
//!
//! Distractor syllables differ from the correct one in exactly one slot,
//! substituted from a type-compatible pool: modifiers swap for modifiers that
//! are legal in that position, cores swap freely between plain vowels and
//! diphthongs. Duplicates of the correct syllable or of one another are
//! rejected, under a bounded attempt limit, so a sparse pool degrades to
//! fewer alternatives instead of failing.

use std::collections::HashSet;

use rand::Rng;

use crate::catalog::Item;
use crate::composition::composer::{position_allows, Syllable};

/// Generate up to `count` near-miss alternatives to a correct syllable.
///
/// `attempts_per_distractor` bounds how hard substitution tries before giving
/// up; the result may be shorter than `count` when the pools cannot support
/// more distinct alternatives.
pub fn distractor_syllables<R: Rng>(
    rng: &mut R,
    correct: &Syllable,
    cores: &[Item],
    modifiers: &[Item],
    count: usize,
    attempts_per_distractor: usize,
) -> Vec<Syllable> {
    let mut alternatives: Vec<Syllable> = Vec::with_capacity(count);
    if correct.is_empty() || count == 0 {
        return alternatives;
    }

    let mut attempts = count.saturating_mul(attempts_per_distractor.max(1));
    while alternatives.len() < count && attempts > 0 {
        attempts -= 1;

        let slot = rng.gen_range(0..correct.entities.len());
        let current = &correct.entities[slot];
        let last_slot = slot + 1 == correct.entities.len();

        // Groups held by the slots we are keeping.
        let kept_groups: HashSet<&str> = correct
            .entities
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != slot)
            .filter_map(|(_, item)| item.exclusion_group())
            .collect();

        let pool: Vec<&Item> = if current.is_modifier() {
            modifiers
                .iter()
                .filter(|item| item.id != current.id)
                .filter(|item| position_allows(item.position(), last_slot))
                .filter(|item| {
                    item.exclusion_group()
                        .map(|group| !kept_groups.contains(group))
                        .unwrap_or(true)
                })
                .collect()
        } else {
            cores.iter().filter(|item| item.id != current.id).collect()
        };
        if pool.is_empty() {
            continue;
        }

        let replacement = pool[rng.gen_range(0..pool.len())].clone();
        let mut entities = correct.entities.clone();
        entities[slot] = replacement;
        let candidate = Syllable::from_entities(entities);

        if candidate.display == correct.display
            || alternatives
                .iter()
                .any(|existing| existing.display == candidate.display)
        {
            continue;
        }
        alternatives.push(candidate);
    }

    if alternatives.len() < count {
        tracing::warn!(
            requested = count,
            produced = alternatives.len(),
            correct = %correct.display,
            "distractor syllable generation fell short"
        );
    }
    alternatives
}
