//! Engine assembly.
//!
//! `PracticeEngine` wires the catalog, the mastery store, and the selection
//! machinery together. The catalog-derived batch list is computed once and
//! cached behind a check-lock-check populate path; every other operation
//! takes a single mastery snapshot up front and never re-reads mid-flight.
//! Concurrent writes land in the next operation's snapshot, an accepted
//! race. Mastery writes go out fire-and-forget.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, RwLock};

use crate::catalog::{ContentCatalog, Item};
use crate::composition::{distractor_syllables, Syllable, SyllableComposer};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::mastery::{mastery_after_correct, mastery_after_incorrect, ExerciseKind};
use crate::progression::{plan_batches, unlocked_batches, Batch, BatchPlan};
use crate::selection::{select_distractors, select_practice};
use crate::store::{MasterySnapshot, MasteryStore};
use crate::variants::{self, Accent, Breathing, ResolvedVariant};

pub struct PracticeEngine<C, S, R = StdRng> {
    catalog: Arc<C>,
    store: Arc<S>,
    config: EngineConfig,
    plan: BatchPlan,
    batches: RwLock<Option<Arc<Vec<Batch>>>>,
    rng: Mutex<R>,
}

impl<C, S> PracticeEngine<C, S>
where
    C: ContentCatalog,
    S: MasteryStore,
{
    pub fn new(catalog: Arc<C>, store: Arc<S>, config: EngineConfig, plan: BatchPlan) -> Self {
        Self::with_rng(catalog, store, config, plan, StdRng::from_entropy())
    }
}

impl<C, S, R> PracticeEngine<C, S, R>
where
    C: ContentCatalog,
    S: MasteryStore,
    R: Rng + Send,
{
    /// Build an engine around an explicit random source; tests inject a
    /// seeded generator here.
    pub fn with_rng(
        catalog: Arc<C>,
        store: Arc<S>,
        config: EngineConfig,
        plan: BatchPlan,
        rng: R,
    ) -> Self {
        Self {
            catalog,
            store,
            config,
            plan,
            batches: RwLock::new(None),
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The planned batch list, computed on first use and cached.
    ///
    /// Check-lock-check: a read probe first, then the write lock re-checks
    /// before planning, so at most one population runs and later readers
    /// never block on planning.
    pub async fn batches(&self) -> Arc<Vec<Batch>> {
        if let Some(cached) = self.batches.read().await.as_ref() {
            return Arc::clone(cached);
        }

        let mut guard = self.batches.write().await;
        if let Some(cached) = guard.as_ref() {
            return Arc::clone(cached);
        }

        let planned = Arc::new(plan_batches(self.catalog.as_ref(), &self.plan));
        tracing::info!(batch_count = planned.len(), "content batches planned");
        *guard = Some(Arc::clone(&planned));
        planned
    }

    /// Drop the cached batch list so the next operation replans. Rebuilds
    /// happen only through this explicit call, never implicitly.
    pub async fn invalidate_batches(&self) {
        *self.batches.write().await = None;
        tracing::debug!("batch cache invalidated");
    }

    /// All items in currently unlocked batches.
    pub async fn unlocked_items(&self) -> Result<Vec<Item>, EngineError> {
        let snapshot = self.store.snapshot();
        self.unlocked_pool(&snapshot).await
    }

    async fn unlocked_pool(&self, snapshot: &MasterySnapshot) -> Result<Vec<Item>, EngineError> {
        let batches = self.batches().await;
        let unlocked = unlocked_batches(&batches, snapshot, self.config.unlock.batch_threshold);
        let items: Vec<Item> = unlocked
            .iter()
            .flat_map(|batch| batch.items.iter().cloned())
            .collect();
        if items.is_empty() {
            return Err(EngineError::NoContentAvailable);
        }
        Ok(items)
    }

    /// Select `count` practice items from the unlocked pool, favoring low
    /// mastery.
    pub async fn next_practice_items(&self, count: usize) -> Result<Vec<Item>, EngineError> {
        let snapshot = self.store.snapshot();
        let pool = self.unlocked_pool(&snapshot).await?;
        let mut rng = self.rng.lock().await;
        let selected = select_practice(&mut *rng, &pool, count, &snapshot)?;
        tracing::debug!(
            requested = count,
            selected = selected.len(),
            pool = pool.len(),
            "practice items selected"
        );
        Ok(selected)
    }

    /// Select incorrect-option distractors from the unlocked pool, excluding
    /// the given ids.
    pub async fn distractors(
        &self,
        exclude: &HashSet<String>,
        count: usize,
    ) -> Result<Vec<Item>, EngineError> {
        let snapshot = self.store.snapshot();
        let pool = self.unlocked_pool(&snapshot).await?;
        let mut rng = self.rng.lock().await;
        select_distractors(&mut *rng, &pool, exclude, count, &snapshot)
    }

    /// Compose one practice syllable from eligible unlocked items.
    pub async fn compose_syllable(&self) -> Result<Option<Syllable>, EngineError> {
        let snapshot = self.store.snapshot();
        let pool = self.unlocked_pool(&snapshot).await?;
        let composer = SyllableComposer::new(self.config.composition.clone());
        let (cores, modifiers) = composer.partition_eligible(&pool, &snapshot);

        let mut rng = self.rng.lock().await;
        composer.compose(&mut *rng, &cores, &modifiers, &snapshot)
    }

    /// Near-miss alternatives to a composed syllable. May return fewer than
    /// requested when the eligible pools cannot support more distinct
    /// substitutions.
    pub async fn syllable_distractors(
        &self,
        correct: &Syllable,
        count: usize,
    ) -> Result<Vec<Syllable>, EngineError> {
        let snapshot = self.store.snapshot();
        let pool = self.unlocked_pool(&snapshot).await?;
        let composer = SyllableComposer::new(self.config.composition.clone());
        let (cores, modifiers) = composer.partition_eligible(&pool, &snapshot);

        let mut rng = self.rng.lock().await;
        Ok(distractor_syllables(
            &mut *rng,
            correct,
            &cores,
            &modifiers,
            count,
            self.config.composition.substitution_attempts,
        ))
    }

    /// Decide which modifiers decorate the next prompt: an independent coin
    /// flip per axis, and within an applying axis the member with the lowest
    /// current mastery wins outright.
    pub async fn pick_modifiers(&self) -> (Option<Breathing>, Option<Accent>) {
        let snapshot = self.store.snapshot();
        let mut rng = self.rng.lock().await;

        let breathing = rng
            .gen_bool(0.5)
            .then(|| lowest_mastery_member(&Breathing::ALL, |b| b.mastery_id(), &snapshot));
        let accent = rng
            .gen_bool(0.5)
            .then(|| lowest_mastery_member(&Accent::ALL, |a| a.mastery_id(), &snapshot));
        (breathing, accent)
    }

    /// Render an item under a modifier combination.
    pub fn resolve_variant(
        &self,
        item: &Item,
        breathing: Option<Breathing>,
        accent: Option<Accent>,
    ) -> ResolvedVariant {
        variants::resolve(item, breathing, accent)
    }

    /// Fold an attempt outcome into mastery and hand the result to the
    /// store. The write is fire-and-forget; the updated value is returned
    /// for the caller's bookkeeping.
    pub async fn record_attempt(
        &self,
        item_id: &str,
        kind: ExerciseKind,
        correct: bool,
        group_exercise: bool,
    ) -> Result<f64, EngineError> {
        let current = self.store.get(item_id);
        let weight = kind.evidence_weight();

        let next = if correct {
            mastery_after_correct(
                current,
                self.config.mastery.base_learn_rate,
                weight,
                group_exercise,
            )
        } else {
            let forget_rate = self.config.mastery.forget_rate()?;
            mastery_after_incorrect(current, forget_rate, weight)
        };

        self.store.set(item_id, next);
        tracing::debug!(
            item_id,
            kind = kind.as_str(),
            correct,
            from = current,
            to = next,
            "mastery updated"
        );
        Ok(next)
    }
}

/// The member of a modifier axis with the lowest current mastery; ties keep
/// declaration order.
fn lowest_mastery_member<T: Copy>(
    members: &[T],
    mastery_id: impl Fn(&T) -> &'static str,
    snapshot: &MasterySnapshot,
) -> T {
    let mut best = members[0];
    let mut best_mastery = snapshot.get(mastery_id(&best));
    for member in &members[1..] {
        let mastery = snapshot.get(mastery_id(member));
        if mastery.partial_cmp(&best_mastery) == Some(Ordering::Less) {
            best = *member;
            best_mastery = mastery;
        }
    }
    best
}
