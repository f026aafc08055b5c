//! Engine configuration.
//!
//! Every tunable lives in a serde-derived struct with a `Default` impl so a
//! deployment can persist, diff, and partially override its configuration.
//! `EngineConfig::from_env` applies environment overrides on top of the
//! defaults for the handful of knobs operators actually turn.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Parameters of the mastery update curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryParams {
    /// Base per-answer learning rate applied on correct attempts.
    pub base_learn_rate: f64,
    /// Base forgetting rate applied on incorrect attempts.
    ///
    /// There is deliberately no default: an unset forget rate is a
    /// configuration error, not a silent zero.
    pub base_forget_rate: Option<f64>,
}

impl Default for MasteryParams {
    fn default() -> Self {
        Self {
            base_learn_rate: 0.1,
            base_forget_rate: None,
        }
    }
}

impl MasteryParams {
    /// The forget rate, or `InvalidConfiguration` when the deployment never
    /// supplied one.
    pub fn forget_rate(&self) -> Result<f64, EngineError> {
        self.base_forget_rate.ok_or_else(|| {
            EngineError::InvalidConfiguration("base forget rate is not set".to_string())
        })
    }
}

/// Parameters of batch unlock evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockParams {
    /// Minimum mastery every item in a batch needs before the next batch of
    /// the same category opens. Category transitions ignore this and require
    /// full mastery.
    pub batch_threshold: f64,
}

impl Default for UnlockParams {
    fn default() -> Self {
        Self {
            batch_threshold: 0.3,
        }
    }
}

/// Parameters of syllable composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionParams {
    /// Items below this mastery are never composed into syllables.
    pub eligibility_floor: f64,
    /// Average eligible mastery above which three-slot syllables may appear.
    pub extended_size_threshold: f64,
    /// Substitution attempts allowed per requested distractor syllable.
    pub substitution_attempts: usize,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            eligibility_floor: 0.2,
            extended_size_threshold: 0.7,
            substitution_attempts: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub mastery: MasteryParams,
    pub unlock: UnlockParams,
    pub composition: CompositionParams,
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRAMMATA_LEARN_RATE") {
            if let Ok(rate) = val.parse() {
                config.mastery.base_learn_rate = rate;
            }
        }
        if let Ok(val) = std::env::var("GRAMMATA_FORGET_RATE") {
            if let Ok(rate) = val.parse() {
                config.mastery.base_forget_rate = Some(rate);
            }
        }
        if let Ok(val) = std::env::var("GRAMMATA_UNLOCK_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.unlock.batch_threshold = threshold;
            }
        }

        config
    }
}
