//! # grammata: adaptive alphabet mastery engine
//!
//! Selects which learning items a user should practice next, tracks per-item
//! mastery, and composes synthetic syllables for drills, following a
//! spaced-repetition-like progression:
//!
//! - **Batch progression**: the catalog is partitioned into ordered,
//!   unlock-gated batches; each gate needs the previous batch above a
//!   threshold, and crossing into a new category needs full mastery of
//!   everything exposed so far.
//! - **Weighted selection**: practice draws favor low-mastery items but keep
//!   mastered ones in rotation; distractor draws square the mastery gap.
//! - **Mastery updates**: asymptotic gains with a visibility floor and a
//!   per-answer cap, proportional capped losses, snapping at both ends.
//! - **Syllable composition**: pattern-template composites from vowel and
//!   consonant roles, with position-bound letter forms and near-miss
//!   distractor syllables.
//! - **Variant resolution**: breathing and accent axes over base glyphs,
//!   with lossless transliteration composition.
//!
//! The engine is pure compute over two external contracts: a read-only
//! [`catalog::ContentCatalog`] and a key-value [`store::MasteryStore`].
//! Consumers embed [`engine::PracticeEngine`] and feed attempt outcomes back
//! through [`engine::PracticeEngine::record_attempt`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use grammata::{
//!     BatchPlan, EngineConfig, InMemoryMasteryStore, PracticeEngine, StaticCatalog,
//! };
//!
//! # async fn demo() -> Result<(), grammata::EngineError> {
//! let catalog = Arc::new(StaticCatalog::new(vec![/* items */]));
//! let store = Arc::new(InMemoryMasteryStore::new());
//! let engine = PracticeEngine::new(
//!     catalog,
//!     store,
//!     EngineConfig::from_env(),
//!     BatchPlan::default(),
//! );
//!
//! let round = engine.next_practice_items(5).await?;
//! # let _ = round;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod mastery;
pub mod progression;
pub mod selection;
pub mod store;
pub mod variants;

pub use catalog::{ContentCatalog, Item, ItemCategory, ItemKind, ScriptPosition, StaticCatalog, VowelLength};
pub use composition::{distractor_syllables, SlotRole, Syllable, SyllableComposer};
pub use config::{CompositionParams, EngineConfig, MasteryParams, UnlockParams};
pub use engine::PracticeEngine;
pub use error::EngineError;
pub use mastery::{mastery_after_correct, mastery_after_incorrect, ExerciseKind};
pub use progression::{plan_batches, unlocked_batches, Batch, BatchPlan, CategoryPlan, GroupingRule};
pub use selection::{select_distractors, select_practice};
pub use store::{InMemoryMasteryStore, MasterySnapshot, MasteryStore};
pub use variants::{Accent, Breathing, ResolvedVariant, VariantKey};
