//! Batch planning.
//!
//! Partitions a catalog snapshot into ordered, unlock-gated batches. Planning
//! is a pure function of (catalog, plan): no side effects, no error paths,
//! and empty categories simply contribute no batches.

use serde::{Deserialize, Serialize};

use crate::catalog::{ContentCatalog, Item, ItemCategory};

/// How one category's items are partitioned into batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingRule {
    /// All of the category's items in one batch.
    Single,
    /// Runs of `n` items in catalog order.
    Chunks(usize),
    /// Fixed membership lists by item id. Items the lists never name fall
    /// into a trailing remainder batch; named-but-absent ids are skipped.
    Members(Vec<Vec<String>>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPlan {
    pub category: ItemCategory,
    pub rule: GroupingRule,
    /// Batches that enhance known content rather than introduce new letters.
    pub enhancement_only: bool,
}

/// Per-category grouping rules in planning priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub categories: Vec<CategoryPlan>,
}

impl Default for BatchPlan {
    /// Default progression: vowels in opening chunks of four, consonants in
    /// chunks of six, diphthongs as a single enhancement batch.
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryPlan {
                    category: ItemCategory::Vowel,
                    rule: GroupingRule::Chunks(4),
                    enhancement_only: false,
                },
                CategoryPlan {
                    category: ItemCategory::Consonant,
                    rule: GroupingRule::Chunks(6),
                    enhancement_only: false,
                },
                CategoryPlan {
                    category: ItemCategory::Diphthong,
                    rule: GroupingRule::Single,
                    enhancement_only: true,
                },
            ],
        }
    }
}

/// An ordered, gated group of items introduced together. Immutable once
/// planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub category: ItemCategory,
    /// Strictly increasing across the whole plan, starting at 1.
    pub order: u32,
    pub enhancement_only: bool,
    pub items: Vec<Item>,
}

/// Partition the catalog into ordered batches, category by category in plan
/// order.
pub fn plan_batches(catalog: &dyn ContentCatalog, plan: &BatchPlan) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut order = 1u32;

    for category_plan in &plan.categories {
        let items = catalog.items_by_category(category_plan.category);
        if items.is_empty() {
            continue;
        }

        for (index, group) in partition(items, &category_plan.rule).into_iter().enumerate() {
            batches.push(Batch {
                id: format!("{}-{}", category_plan.category.as_str(), index + 1),
                category: category_plan.category,
                order,
                enhancement_only: category_plan.enhancement_only,
                items: group,
            });
            order += 1;
        }
    }

    batches
}

fn partition(items: Vec<Item>, rule: &GroupingRule) -> Vec<Vec<Item>> {
    match rule {
        GroupingRule::Single => vec![items],
        GroupingRule::Chunks(size) => {
            let size = (*size).max(1);
            items
                .chunks(size)
                .map(|chunk| chunk.to_vec())
                .collect()
        }
        GroupingRule::Members(lists) => {
            let mut remaining: Vec<Option<Item>> = items.into_iter().map(Some).collect();
            let mut groups = Vec::with_capacity(lists.len() + 1);

            for list in lists {
                let mut group = Vec::with_capacity(list.len());
                for id in list {
                    let taken = remaining
                        .iter_mut()
                        .find(|slot| slot.as_ref().is_some_and(|item| &item.id == id))
                        .and_then(Option::take);
                    if let Some(item) = taken {
                        group.push(item);
                    }
                }
                if !group.is_empty() {
                    groups.push(group);
                }
            }

            let leftover: Vec<Item> = remaining.into_iter().flatten().collect();
            if !leftover.is_empty() {
                groups.push(leftover);
            }
            groups
        }
    }
}
