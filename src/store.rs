//! Mastery persistence contract.
//!
//! The engine never owns mastery durably. It reads one snapshot per logical
//! operation, computes against that snapshot, and hands results back through
//! `set` without awaiting durability. Concurrent writes during an operation
//! are an accepted race: the next operation's snapshot observes them.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Point-in-time view of per-item mastery.
///
/// Absent ids read as 0.0 and every ingested value is clamped to [0, 1], so
/// downstream math never sees out-of-range mastery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterySnapshot {
    values: HashMap<String, f64>,
}

impl MasterySnapshot {
    pub fn new(values: HashMap<String, f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(id, v)| (id, v.clamp(0.0, 1.0)))
                .collect(),
        }
    }

    pub fn get(&self, item_id: &str) -> f64 {
        self.values.get(item_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for MasterySnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// External key-value mastery store.
///
/// `set` is fire-and-forget from the engine's perspective: implementations
/// may buffer, batch, or replicate, and the engine returns selection results
/// without waiting for confirmation.
pub trait MasteryStore: Send + Sync {
    /// Current mastery for one item; unknown ids are 0.0.
    fn get(&self, item_id: &str) -> f64;

    /// Snapshot of the whole map, taken once per engine operation.
    fn snapshot(&self) -> MasterySnapshot;

    /// Record a new mastery value.
    fn set(&self, item_id: &str, mastery: f64);
}

/// Process-local store; the default for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryMasteryStore {
    values: RwLock<HashMap<String, f64>>,
}

impl InMemoryMasteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed several values at once, clamping as a real store would.
    pub fn seed<I>(&self, values: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut guard = self.values.write();
        for (id, value) in values {
            guard.insert(id, value.clamp(0.0, 1.0));
        }
    }
}

impl MasteryStore for InMemoryMasteryStore {
    fn get(&self, item_id: &str) -> f64 {
        self.values.read().get(item_id).copied().unwrap_or(0.0)
    }

    fn snapshot(&self) -> MasterySnapshot {
        MasterySnapshot::new(self.values.read().clone())
    }

    fn set(&self, item_id: &str, mastery: f64) {
        self.values
            .write()
            .insert(item_id.to_string(), mastery.clamp(0.0, 1.0));
    }
}
