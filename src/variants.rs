//! Diacritic variant resolution.
//!
//! Two independent modifier axes decorate a base item: breathing (smooth or
//! rough) and accent (acute, grave, circumflex). Glyphs come from the item's
//! precomputed variant table; transliterations are constructed, because the
//! two axes decorate different character positions and must compose
//! losslessly: the breathing marker attaches to the onset while the accent
//! lands on the first vowel.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::catalog::Item;

/// Marker substring a rough breathing contributes to a transliteration.
const ASPIRATION_MARKER: char = 'h';

/// Breathing axis. Rough is the marked form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breathing {
    Smooth,
    Rough,
}

impl Breathing {
    pub const ALL: [Breathing; 2] = [Breathing::Smooth, Breathing::Rough];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Rough => "rough",
        }
    }

    /// Key under which this member's own mastery is tracked.
    pub fn mastery_id(&self) -> &'static str {
        match self {
            Self::Smooth => "breathing.smooth",
            Self::Rough => "breathing.rough",
        }
    }

    /// Whether this member changes the transliteration at all.
    pub fn is_marked(&self) -> bool {
        matches!(self, Self::Rough)
    }
}

/// Accent axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Acute,
    Grave,
    Circumflex,
}

impl Accent {
    pub const ALL: [Accent; 3] = [Accent::Acute, Accent::Grave, Accent::Circumflex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acute => "acute",
            Self::Grave => "grave",
            Self::Circumflex => "circumflex",
        }
    }

    pub fn mastery_id(&self) -> &'static str {
        match self {
            Self::Acute => "accent.acute",
            Self::Grave => "accent.grave",
            Self::Circumflex => "accent.circumflex",
        }
    }

    /// Combining diacritical mark appended to the decorated character.
    pub fn combining_mark(&self) -> char {
        match self {
            Self::Acute => '\u{0301}',
            Self::Grave => '\u{0300}',
            Self::Circumflex => '\u{0302}',
        }
    }
}

/// Key into an item's precomputed variant glyph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VariantKey {
    pub breathing: Option<Breathing>,
    pub accent: Option<Accent>,
}

impl VariantKey {
    pub fn new(breathing: Option<Breathing>, accent: Option<Accent>) -> Self {
        Self { breathing, accent }
    }
}

impl From<VariantKey> for String {
    fn from(key: VariantKey) -> Self {
        match (key.breathing, key.accent) {
            (None, None) => "base".to_string(),
            (Some(b), None) => b.as_str().to_string(),
            (None, Some(a)) => a.as_str().to_string(),
            (Some(b), Some(a)) => format!("{}+{}", b.as_str(), a.as_str()),
        }
    }
}

impl TryFrom<String> for VariantKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        fn breathing(s: &str) -> Option<Breathing> {
            Breathing::ALL.into_iter().find(|b| b.as_str() == s)
        }
        fn accent(s: &str) -> Option<Accent> {
            Accent::ALL.into_iter().find(|a| a.as_str() == s)
        }

        if value == "base" {
            return Ok(Self::new(None, None));
        }
        if let Some((left, right)) = value.split_once('+') {
            match (breathing(left), accent(right)) {
                (Some(b), Some(a)) => return Ok(Self::new(Some(b), Some(a))),
                _ => return Err(format!("unknown variant key: {value}")),
            }
        }
        if let Some(b) = breathing(&value) {
            return Ok(Self::new(Some(b), None));
        }
        if let Some(a) = accent(&value) {
            return Ok(Self::new(None, Some(a)));
        }
        Err(format!("unknown variant key: {value}"))
    }
}

/// A base item rendered under a concrete modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariant {
    pub display: String,
    pub transliteration: String,
}

/// Look up the displayed glyph for a modifier combination.
///
/// Both axes present means only the combined key is consulted; a missing
/// entry falls back to the base glyph rather than to a single-axis variant.
pub fn resolve_glyph(item: &Item, breathing: Option<Breathing>, accent: Option<Accent>) -> String {
    let lookup = |key: VariantKey| -> Option<String> { item.variants.get(&key).cloned() };

    match (breathing, accent) {
        (None, None) => item.glyph.clone(),
        (b @ Some(_), a @ Some(_)) => {
            lookup(VariantKey::new(b, a)).unwrap_or_else(|| item.glyph.clone())
        }
        (b @ Some(_), None) => lookup(VariantKey::new(b, None)).unwrap_or_else(|| item.glyph.clone()),
        (None, a @ Some(_)) => lookup(VariantKey::new(None, a)).unwrap_or_else(|| item.glyph.clone()),
    }
}

/// Construct the transliteration for a modifier combination.
///
/// A rough breathing prepends the aspiration marker, except after a leading
/// "r" where the marker trails the onset ("r" would otherwise swallow it:
/// aspirated rho reads "rh"). The accent then decorates the character
/// immediately after the marker when the base transliteration is a single
/// character, otherwise the first vowel after the marker, and the result is
/// normalized to composed (NFC) form.
pub fn decorate_transliteration(
    base: &str,
    breathing: Option<Breathing>,
    accent: Option<Accent>,
) -> String {
    let aspirated = breathing.map(|b| b.is_marked()).unwrap_or(false);

    let mut marked = String::with_capacity(base.len() + 3);
    let mut marker_end = 0usize;
    if aspirated {
        if let Some(rest) = base.strip_prefix('r') {
            marked.push('r');
            marked.push(ASPIRATION_MARKER);
            marked.push_str(rest);
            marker_end = 2;
        } else {
            marked.push(ASPIRATION_MARKER);
            marked.push_str(base);
            marker_end = 1;
        }
    } else {
        marked.push_str(base);
    }

    let accent = match accent {
        Some(accent) => accent,
        None => return marked,
    };

    let chars: Vec<char> = marked.chars().collect();
    let target = if base.chars().count() == 1 {
        marker_end.min(chars.len().saturating_sub(1))
    } else {
        chars
            .iter()
            .enumerate()
            .skip(marker_end)
            .find(|(_, c)| is_transliteration_vowel(**c))
            .map(|(idx, _)| idx)
            .unwrap_or(chars.len().saturating_sub(1))
    };

    let mut decorated = String::with_capacity(marked.len() + 2);
    for (idx, c) in chars.iter().enumerate() {
        decorated.push(*c);
        if idx == target {
            decorated.push(accent.combining_mark());
        }
    }
    decorated.nfc().collect()
}

/// Resolve glyph and transliteration together.
pub fn resolve(item: &Item, breathing: Option<Breathing>, accent: Option<Accent>) -> ResolvedVariant {
    ResolvedVariant {
        display: resolve_glyph(item, breathing, accent),
        transliteration: decorate_transliteration(&item.transliteration, breathing, accent),
    }
}

fn is_transliteration_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'ē' | 'ō')
}

/// Convenience for building variant tables in catalogs and fixtures.
pub fn variant_table<I>(entries: I) -> HashMap<VariantKey, String>
where
    I: IntoIterator<Item = (VariantKey, &'static str)>,
{
    entries
        .into_iter()
        .map(|(key, glyph)| (key, glyph.to_string()))
        .collect()
}
