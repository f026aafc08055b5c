//! Integration tests for `PracticeEngine` over a small Greek fixture
//! catalog: four vowels, five consonants (including both sigma forms), and
//! one diphthong, planned with the default batch plan.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use grammata::{
    Accent, BatchPlan, Breathing, EngineConfig, EngineError, ExerciseKind, InMemoryMasteryStore,
    Item, ItemCategory, ItemKind, PracticeEngine, ScriptPosition, StaticCatalog, VariantKey,
    VowelLength,
};

fn vowel(id: &str, glyph: &str, translit: &str) -> Item {
    Item {
        id: id.to_string(),
        glyph: glyph.to_string(),
        transliteration: translit.to_string(),
        kind: ItemKind::Vowel {
            length: VowelLength::Variable,
        },
        variants: HashMap::new(),
    }
}

fn consonant(id: &str, glyph: &str, translit: &str) -> Item {
    Item {
        id: id.to_string(),
        glyph: glyph.to_string(),
        transliteration: translit.to_string(),
        kind: ItemKind::Consonant {
            position: ScriptPosition::Any,
            exclusion_group: None,
        },
        variants: HashMap::new(),
    }
}

fn sigma(id: &str, glyph: &str, position: ScriptPosition) -> Item {
    Item {
        id: id.to_string(),
        glyph: glyph.to_string(),
        transliteration: "s".to_string(),
        kind: ItemKind::Consonant {
            position,
            exclusion_group: Some("sigma".to_string()),
        },
        variants: HashMap::new(),
    }
}

fn fixture_items() -> Vec<Item> {
    vec![
        vowel("vowel.alpha", "α", "a"),
        vowel("vowel.epsilon", "ε", "e"),
        vowel("vowel.iota", "ι", "i"),
        vowel("vowel.omicron", "ο", "o"),
        consonant("consonant.beta", "β", "b"),
        consonant("consonant.tau", "τ", "t"),
        consonant("consonant.nu", "ν", "n"),
        sigma("consonant.sigma.medial", "σ", ScriptPosition::Medial),
        sigma("consonant.sigma.final", "ς", ScriptPosition::Final),
        Item {
            id: "diphthong.ai".to_string(),
            glyph: "αι".to_string(),
            transliteration: "ai".to_string(),
            kind: ItemKind::Diphthong {
                components: ['α', 'ι'],
            },
            variants: HashMap::new(),
        },
    ]
}

fn vowel_ids() -> Vec<&'static str> {
    vec!["vowel.alpha", "vowel.epsilon", "vowel.iota", "vowel.omicron"]
}

fn consonant_ids() -> Vec<&'static str> {
    vec![
        "consonant.beta",
        "consonant.tau",
        "consonant.nu",
        "consonant.sigma.medial",
        "consonant.sigma.final",
    ]
}

fn engine_with_store(
    store: Arc<InMemoryMasteryStore>,
    config: EngineConfig,
) -> PracticeEngine<StaticCatalog, InMemoryMasteryStore, ChaCha8Rng> {
    PracticeEngine::with_rng(
        Arc::new(StaticCatalog::new(fixture_items())),
        store,
        config,
        BatchPlan::default(),
        ChaCha8Rng::seed_from_u64(7),
    )
}

fn default_engine() -> PracticeEngine<StaticCatalog, InMemoryMasteryStore, ChaCha8Rng> {
    engine_with_store(Arc::new(InMemoryMasteryStore::new()), EngineConfig::default())
}

fn seed_all(store: &InMemoryMasteryStore, ids: &[&str], mastery: f64) {
    store.seed(ids.iter().map(|id| (id.to_string(), mastery)));
}

#[tokio::test]
async fn fresh_learner_only_sees_the_opening_batch() {
    let engine = default_engine();

    let items = engine.unlocked_items().await.unwrap();
    let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vowel_ids().into_iter().collect::<HashSet<_>>());

    let selected = engine.next_practice_items(3).await.unwrap();
    assert_eq!(selected.len(), 3);
    assert!(selected.iter().all(|i| i.category() == ItemCategory::Vowel));
}

#[tokio::test]
async fn near_full_mastery_does_not_cross_categories() {
    let store = Arc::new(InMemoryMasteryStore::new());
    seed_all(&store, &vowel_ids(), 0.99);
    let engine = engine_with_store(store, EngineConfig::default());

    let items = engine.unlocked_items().await.unwrap();
    assert!(
        items.iter().all(|i| i.category() == ItemCategory::Vowel),
        "0.99 mastery must not open the consonant batch"
    );
}

#[tokio::test]
async fn full_vowel_mastery_unlocks_consonants() {
    let store = Arc::new(InMemoryMasteryStore::new());
    seed_all(&store, &vowel_ids(), 1.0);
    let engine = engine_with_store(store, EngineConfig::default());

    let items = engine.unlocked_items().await.unwrap();
    let categories: HashSet<ItemCategory> = items.iter().map(|i| i.category()).collect();
    assert!(categories.contains(&ItemCategory::Consonant));
    assert!(
        !categories.contains(&ItemCategory::Diphthong),
        "the diphthong batch waits for consonant mastery"
    );
}

#[tokio::test]
async fn batches_expose_the_enhancement_flag() {
    let engine = default_engine();
    let batches = engine.batches().await;

    assert_eq!(batches.len(), 3);
    let diphthong_batch = batches
        .iter()
        .find(|b| b.category == ItemCategory::Diphthong)
        .unwrap();
    assert!(diphthong_batch.enhancement_only);
    let orders: Vec<u32> = batches.iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn correct_answer_from_zero_gains_the_cap() {
    let engine = default_engine();

    let next = engine
        .record_attempt("vowel.alpha", ExerciseKind::Recall, true, false)
        .await
        .unwrap();
    assert!((next - 0.05).abs() < 1e-12, "got {next}");
}

#[tokio::test]
async fn repeated_correct_answers_reach_exactly_full_mastery() {
    let engine = default_engine();

    let mut mastery = 0.0;
    for _ in 0..200 {
        mastery = engine
            .record_attempt("vowel.alpha", ExerciseKind::Recall, true, false)
            .await
            .unwrap();
        assert!((0.0..=1.0).contains(&mastery));
        if mastery == 1.0 {
            break;
        }
    }
    assert_eq!(mastery, 1.0, "mastery should snap to exactly 1.0");
}

#[tokio::test]
async fn incorrect_answer_without_forget_rate_is_a_configuration_error() {
    let engine = default_engine();

    let result = engine
        .record_attempt("vowel.alpha", ExerciseKind::Recall, false, false)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn incorrect_answer_with_forget_rate_decays_mastery() {
    let store = Arc::new(InMemoryMasteryStore::new());
    store.seed([("vowel.alpha".to_string(), 0.5)]);
    let mut config = EngineConfig::default();
    config.mastery.base_forget_rate = Some(0.2);
    let engine = engine_with_store(store, config);

    let next = engine
        .record_attempt("vowel.alpha", ExerciseKind::Recall, false, false)
        .await
        .unwrap();
    assert!((next - 0.4).abs() < 1e-12, "got {next}");
}

#[tokio::test]
async fn group_evidence_moves_mastery_less_than_solo_evidence() {
    // Start high enough that neither gain saturates the per-answer cap.
    let store = Arc::new(InMemoryMasteryStore::new());
    store.seed([
        ("vowel.alpha".to_string(), 0.6),
        ("vowel.epsilon".to_string(), 0.6),
    ]);
    let engine = engine_with_store(store, EngineConfig::default());

    let solo = engine
        .record_attempt("vowel.alpha", ExerciseKind::Listening, true, false)
        .await
        .unwrap();
    let group = engine
        .record_attempt("vowel.epsilon", ExerciseKind::Listening, true, true)
        .await
        .unwrap();
    assert!(group < solo, "group {group} should trail solo {solo}");
}

#[tokio::test]
async fn distractors_exclude_the_prompted_item() {
    let engine = default_engine();

    let exclude: HashSet<String> = ["vowel.alpha".to_string()].into();
    let distractors = engine.distractors(&exclude, 2).await.unwrap();

    assert_eq!(distractors.len(), 2);
    assert!(distractors.iter().all(|i| i.id != "vowel.alpha"));
}

#[tokio::test]
async fn excluding_the_whole_pool_yields_no_eligible_items() {
    let engine = default_engine();

    let exclude: HashSet<String> = vowel_ids().into_iter().map(String::from).collect();
    let result = engine.distractors(&exclude, 2).await;
    assert_eq!(result, Err(EngineError::NoEligibleItems));
}

#[tokio::test]
async fn composition_needs_consonants_unlocked() {
    // Only vowels are unlocked, so no modifier role exists yet.
    let store = Arc::new(InMemoryMasteryStore::new());
    seed_all(&store, &vowel_ids(), 0.5);
    let engine = engine_with_store(store, EngineConfig::default());

    let result = engine.compose_syllable().await;
    assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn composed_syllables_draw_from_unlocked_eligible_items() {
    let store = Arc::new(InMemoryMasteryStore::new());
    seed_all(&store, &vowel_ids(), 1.0);
    seed_all(&store, &consonant_ids(), 0.5);
    let engine = engine_with_store(store, EngineConfig::default());

    let unlocked: HashSet<String> = engine
        .unlocked_items()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    for _ in 0..20 {
        let syllable = engine
            .compose_syllable()
            .await
            .unwrap()
            .expect("fixture pools cover every slot");
        assert!(syllable.len() >= 2);
        assert!(syllable.entities.iter().all(|i| unlocked.contains(&i.id)));

        let sigma_forms = syllable
            .entities
            .iter()
            .filter(|i| i.id.starts_with("consonant.sigma"))
            .count();
        assert!(sigma_forms <= 1, "both sigma forms in one syllable");
    }
}

#[tokio::test]
async fn syllable_distractors_are_distinct_near_misses() {
    let store = Arc::new(InMemoryMasteryStore::new());
    seed_all(&store, &vowel_ids(), 1.0);
    seed_all(&store, &consonant_ids(), 0.5);
    let engine = engine_with_store(store, EngineConfig::default());

    let correct = engine
        .compose_syllable()
        .await
        .unwrap()
        .expect("fixture pools cover every slot");
    let alternatives = engine.syllable_distractors(&correct, 3).await.unwrap();

    assert!(!alternatives.is_empty());
    let mut displays: HashSet<String> = HashSet::new();
    for alternative in &alternatives {
        assert_ne!(alternative.display, correct.display);
        assert!(
            displays.insert(alternative.display.clone()),
            "duplicate distractor {}",
            alternative.display
        );
    }
}

#[tokio::test]
async fn modifier_picks_are_greedy_within_an_axis() {
    let store = Arc::new(InMemoryMasteryStore::new());
    store.seed([
        ("breathing.smooth".to_string(), 0.9),
        ("breathing.rough".to_string(), 0.1),
        ("accent.acute".to_string(), 0.7),
        ("accent.grave".to_string(), 0.9),
        ("accent.circumflex".to_string(), 0.3),
    ]);
    let engine = engine_with_store(store, EngineConfig::default());

    let mut saw_breathing = false;
    let mut saw_accent = false;
    for _ in 0..40 {
        let (breathing, accent) = engine.pick_modifiers().await;
        if let Some(b) = breathing {
            saw_breathing = true;
            assert_eq!(b, Breathing::Rough, "greedy pick must take lowest mastery");
        }
        if let Some(a) = accent {
            saw_accent = true;
            assert_eq!(a, Accent::Circumflex, "greedy pick must take lowest mastery");
        }
    }
    assert!(saw_breathing && saw_accent, "coin flips should land both ways");
}

#[tokio::test]
async fn variant_resolution_round_trips_through_the_engine() {
    let engine = default_engine();

    let mut item = vowel("vowel.alpha", "α", "a");
    item.variants.insert(
        VariantKey::new(Some(Breathing::Rough), Some(Accent::Acute)),
        "ἅ".to_string(),
    );

    let plain = engine.resolve_variant(&item, None, None);
    assert_eq!(plain.display, "α");
    assert_eq!(plain.transliteration, "a");

    let marked = engine.resolve_variant(&item, Some(Breathing::Rough), Some(Accent::Acute));
    assert_eq!(marked.display, "ἅ");
    assert_eq!(marked.transliteration, "há");
}

#[tokio::test]
async fn empty_catalog_reports_no_content() {
    let engine: PracticeEngine<StaticCatalog, InMemoryMasteryStore, ChaCha8Rng> =
        PracticeEngine::with_rng(
            Arc::new(StaticCatalog::new(Vec::new())),
            Arc::new(InMemoryMasteryStore::new()),
            EngineConfig::default(),
            BatchPlan::default(),
            ChaCha8Rng::seed_from_u64(1),
        );

    assert_eq!(
        engine.next_practice_items(3).await,
        Err(EngineError::NoContentAvailable)
    );
}
