use thiserror::Error;

/// Failures surfaced by engine operations.
///
/// All of these are local, synchronous errors: the engine is pure compute
/// over already-fetched data and never retries on its own. Soft shortfalls
/// (not enough weighted candidates, a failed single substitution) degrade to
/// fallbacks instead of reaching this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No unlocked batches, or the practice pool is empty after filtering.
    #[error("no unlocked content available")]
    NoContentAvailable,

    /// The distractor pool is empty once exclusions are applied.
    #[error("no eligible items after exclusions")]
    NoEligibleItems,

    /// The caller asked for something the configuration cannot satisfy.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
