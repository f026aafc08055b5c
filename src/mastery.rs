//! Mastery update math.
//!
//! Correct answers follow an asymptotic learning curve: the gain shrinks as
//! mastery approaches 1.0, with a floor so progress stays visible and a
//! ceiling so no single answer jumps mastery. Incorrect answers decay
//! proportionally to current mastery with a hard cap. Both directions snap
//! near the boundary so items reach exactly 0.0 or 1.0 instead of orbiting
//! them in float dust.
//!
//! Everything here is a pure function of its inputs; persisting the result
//! is the caller's responsibility.

use serde::{Deserialize, Serialize};

/// Composite-syllable evidence is weaker per item than a dedicated exercise.
pub const GROUP_EVIDENCE_FACTOR: f64 = 0.75;

/// Floor on the per-answer gain, as a fraction of the exercise weight.
pub const MIN_GAIN_FACTOR: f64 = 0.01;

/// Ceiling on the per-answer gain, as a fraction of the exercise weight.
pub const MAX_GAIN_FACTOR: f64 = 0.05;

/// Ceiling on the per-answer loss, as a fraction of the exercise weight.
pub const MAX_LOSS_FACTOR: f64 = 0.15;

/// At or above this value mastery snaps to exactly 1.0.
pub const FULL_MASTERY_SNAP: f64 = 0.97;

/// At or below this value mastery snaps to exactly 0.0.
pub const ZERO_MASTERY_SNAP: f64 = 0.03;

/// Exercise kinds, ranked by how much evidence one answer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Multiple-choice glyph recognition; the weakest signal.
    #[default]
    Recognition,
    /// Audio-to-glyph matching.
    Listening,
    /// Produce the answer unaided; the strongest signal.
    Recall,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recognition => "recognition",
            Self::Listening => "listening",
            Self::Recall => "recall",
        }
    }

    /// Relative evidentiary strength of one answer of this kind.
    pub fn evidence_weight(&self) -> f64 {
        match self {
            Self::Recognition => 0.6,
            Self::Listening => 0.8,
            Self::Recall => 1.0,
        }
    }
}

/// New mastery after a correct answer.
pub fn mastery_after_correct(
    current: f64,
    learn_rate: f64,
    weight: f64,
    group_exercise: bool,
) -> f64 {
    let current = current.clamp(0.0, 1.0);
    let rate = if group_exercise {
        learn_rate * GROUP_EVIDENCE_FACTOR
    } else {
        learn_rate
    };

    let raw_increment = (1.0 - current) * rate * weight;
    let actual_increment = raw_increment.max(MIN_GAIN_FACTOR * weight);
    let capped_increase = actual_increment.min(MAX_GAIN_FACTOR * weight);

    let next = current + capped_increase;
    if next >= FULL_MASTERY_SNAP {
        return 1.0;
    }
    next.clamp(0.0, 1.0)
}

/// New mastery after an incorrect answer.
pub fn mastery_after_incorrect(current: f64, forget_rate: f64, weight: f64) -> f64 {
    let current = current.clamp(0.0, 1.0);

    let decrement = current * forget_rate * weight;
    let capped_decrease = decrement.min(MAX_LOSS_FACTOR * weight);

    let next = current - capped_decrease;
    if next <= ZERO_MASTERY_SNAP {
        return 0.0;
    }
    next.clamp(0.0, 1.0)
}
