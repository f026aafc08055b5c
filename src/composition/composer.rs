//! Pattern-template syllable composition.
//!
//! A syllable is a short composite token built from two disjoint roles: a
//! core (vowel or diphthong) and modifiers (consonants). The pattern decides
//! slot order; each slot draws from a positional pool so that position-bound
//! consonant forms only ever land where the script allows them.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::catalog::{Item, ScriptPosition};
use crate::config::CompositionParams;
use crate::error::EngineError;
use crate::selection::weighted_pick_index;
use crate::store::MasterySnapshot;

/// Role a pattern slot asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Core,
    Modifier,
}

/// Ephemeral multi-item composite, created per practice round and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllable {
    pub entities: Vec<Item>,
    pub display: String,
    pub transliteration: String,
}

impl Syllable {
    /// Concatenate slot glyphs and transliterations in slot order.
    pub fn from_entities(entities: Vec<Item>) -> Self {
        let display = entities.iter().map(|item| item.glyph.as_str()).collect();
        let transliteration = entities
            .iter()
            .map(|item| item.transliteration.as_str())
            .collect();
        Self {
            entities,
            display,
            transliteration,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Whether a consonant form may occupy a slot, by script position.
pub(crate) fn position_allows(position: ScriptPosition, last_slot: bool) -> bool {
    match position {
        ScriptPosition::Any => true,
        ScriptPosition::Medial => !last_slot,
        ScriptPosition::Final => last_slot,
    }
}

#[derive(Debug, Clone)]
pub struct SyllableComposer {
    params: CompositionParams,
}

impl SyllableComposer {
    pub fn new(params: CompositionParams) -> Self {
        Self { params }
    }

    /// Split a pool into (cores, modifiers), keeping only items at or above
    /// the eligibility floor.
    pub fn partition_eligible(
        &self,
        pool: &[Item],
        snapshot: &MasterySnapshot,
    ) -> (Vec<Item>, Vec<Item>) {
        let mut cores = Vec::new();
        let mut modifiers = Vec::new();
        for item in pool {
            if snapshot.get(&item.id) < self.params.eligibility_floor {
                continue;
            }
            if item.is_core() {
                cores.push(item.clone());
            } else {
                modifiers.push(item.clone());
            }
        }
        (cores, modifiers)
    }

    /// Compose one syllable from eligible role pools.
    ///
    /// An empty role pool is a configuration problem; a slot whose positional
    /// pool comes up empty just means no syllable exists this round.
    pub fn compose<R: Rng>(
        &self,
        rng: &mut R,
        cores: &[Item],
        modifiers: &[Item],
        snapshot: &MasterySnapshot,
    ) -> Result<Option<Syllable>, EngineError> {
        if cores.is_empty() || modifiers.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "syllable composition needs both core and modifier items".to_string(),
            ));
        }

        let pattern = self.choose_pattern(rng, cores, modifiers, snapshot);

        let mut entities: Vec<Item> = Vec::with_capacity(pattern.len());
        let mut used_groups: HashSet<String> = HashSet::new();
        for (index, role) in pattern.iter().enumerate() {
            let last_slot = index + 1 == pattern.len();
            let pool: Vec<&Item> = match role {
                SlotRole::Core => cores.iter().collect(),
                SlotRole::Modifier => modifiers
                    .iter()
                    .filter(|item| position_allows(item.position(), last_slot))
                    .filter(|item| {
                        item.exclusion_group()
                            .map(|group| !used_groups.contains(group))
                            .unwrap_or(true)
                    })
                    .collect(),
            };
            if pool.is_empty() {
                return Ok(None);
            }

            let weights: Vec<f64> = pool
                .iter()
                .map(|item| 1.0 - snapshot.get(&item.id))
                .collect();
            let Some(pick) = weighted_pick_index(rng, &weights) else {
                return Ok(None);
            };
            let item = pool[pick].clone();
            if let Some(group) = item.exclusion_group() {
                used_groups.insert(group.to_string());
            }
            entities.push(item);
        }

        Ok(Some(Syllable::from_entities(entities)))
    }

    /// Two slots while average mastery sits at or below the extended-size
    /// threshold or either role pool is thin; otherwise a coin decides
    /// between two and three. Orientation of the chosen size is random.
    fn choose_pattern<R: Rng>(
        &self,
        rng: &mut R,
        cores: &[Item],
        modifiers: &[Item],
        snapshot: &MasterySnapshot,
    ) -> Vec<SlotRole> {
        let total = cores.len() + modifiers.len();
        let sum: f64 = cores
            .iter()
            .chain(modifiers.iter())
            .map(|item| snapshot.get(&item.id))
            .sum();
        let average = sum / total as f64;

        let may_extend = average > self.params.extended_size_threshold
            && cores.len() >= 2
            && modifiers.len() >= 2;
        let size = if may_extend && rng.gen_bool(0.5) { 3 } else { 2 };

        match (size, rng.gen_bool(0.5)) {
            (2, true) => vec![SlotRole::Modifier, SlotRole::Core],
            (2, false) => vec![SlotRole::Core, SlotRole::Modifier],
            (_, true) => vec![SlotRole::Modifier, SlotRole::Core, SlotRole::Modifier],
            (_, false) => vec![SlotRole::Core, SlotRole::Modifier, SlotRole::Core],
        }
    }
}
