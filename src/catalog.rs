//! Item model and catalog access.
//!
//! The catalog is an external, read-only data source: the engine asks for a
//! category's items and treats the result as an immutable snapshot. Items are
//! tagged by a category payload rather than an inheritance hierarchy, so call
//! sites match exhaustively on what an item is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::variants::VariantKey;

/// Content categories, in batch-planning priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Vowel,
    Consonant,
    Diphthong,
}

impl ItemCategory {
    /// Fixed planning order: vowels open the progression, consonants follow,
    /// diphthongs enhance what is already known.
    pub const PRIORITY: [ItemCategory; 3] = [
        ItemCategory::Vowel,
        ItemCategory::Consonant,
        ItemCategory::Diphthong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vowel => "vowel",
            Self::Consonant => "consonant",
            Self::Diphthong => "diphthong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VowelLength {
    Short,
    Long,
    Variable,
}

/// Where a glyph may appear inside a written syllable or word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptPosition {
    /// Usable anywhere.
    Any,
    /// Only before the end (e.g. medial sigma).
    Medial,
    /// Only at the end (e.g. final sigma).
    Final,
}

/// Category-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ItemKind {
    Vowel {
        length: VowelLength,
    },
    Consonant {
        position: ScriptPosition,
        /// Items sharing a group are alternate forms of one underlying
        /// letter; at most one of them may appear per selection or syllable.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exclusion_group: Option<String>,
    },
    Diphthong {
        components: [char; 2],
    },
}

impl ItemKind {
    pub fn category(&self) -> ItemCategory {
        match self {
            Self::Vowel { .. } => ItemCategory::Vowel,
            Self::Consonant { .. } => ItemCategory::Consonant,
            Self::Diphthong { .. } => ItemCategory::Diphthong,
        }
    }
}

/// An atomic learning unit. Immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub glyph: String,
    pub transliteration: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    /// Precomputed glyphs per modifier combination; empty for items that
    /// never take diacritics.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variants: HashMap<VariantKey, String>,
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Vowels and diphthongs form the core of a syllable.
    pub fn is_core(&self) -> bool {
        matches!(self.kind, ItemKind::Vowel { .. } | ItemKind::Diphthong { .. })
    }

    /// Consonants modify a syllable core.
    pub fn is_modifier(&self) -> bool {
        matches!(self.kind, ItemKind::Consonant { .. })
    }

    pub fn position(&self) -> ScriptPosition {
        match &self.kind {
            ItemKind::Consonant { position, .. } => *position,
            _ => ScriptPosition::Any,
        }
    }

    pub fn exclusion_group(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Consonant {
                exclusion_group, ..
            } => exclusion_group.as_deref(),
            _ => None,
        }
    }
}

/// Read-only source of learning items. In-process data access; no protocol.
pub trait ContentCatalog: Send + Sync {
    /// A category's items in canonical teaching order. Unknown or empty
    /// categories return an empty list.
    fn items_by_category(&self, category: ItemCategory) -> Vec<Item>;
}

/// Catalog backed by a plain item list, preserved in declaration order.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<Item>,
}

impl StaticCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl ContentCatalog for StaticCatalog {
    fn items_by_category(&self, category: ItemCategory) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.category() == category)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn static_catalog_filters_by_category() {
        let vowel = Item {
            id: "vowel.alpha".to_string(),
            glyph: "α".to_string(),
            transliteration: "a".to_string(),
            kind: ItemKind::Vowel {
                length: VowelLength::Variable,
            },
            variants: HashMap::new(),
        };
        let catalog = StaticCatalog::new(vec![vowel.clone(), consonant("consonant.beta", "β", "b")]);

        let vowels = catalog.items_by_category(ItemCategory::Vowel);
        assert_eq!(vowels, vec![vowel]);
        assert_eq!(catalog.items_by_category(ItemCategory::Diphthong), vec![]);
    }

    #[test]
    fn roles_follow_the_category_payload() {
        let consonant = consonant("consonant.beta", "β", "b");
        assert!(consonant.is_modifier());
        assert!(!consonant.is_core());

        let diphthong = Item {
            id: "diphthong.ai".to_string(),
            glyph: "αι".to_string(),
            transliteration: "ai".to_string(),
            kind: ItemKind::Diphthong {
                components: ['α', 'ι'],
            },
            variants: HashMap::new(),
        };
        assert!(diphthong.is_core());
        assert_eq!(diphthong.position(), ScriptPosition::Any);
    }

    #[test]
    fn item_serialization_tags_the_category() {
        let item = consonant("consonant.sigma", "σ", "s");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "consonant");
        assert_eq!(json["glyph"], "σ");
    }
}
