//! Abbreviation table: short forms expanded to their long forms before counting.

use rustc_hash::FxHashMap;

use crate::analyzer::normalizer::{NormalizerConfig, WordNormalizer};

/// Abbreviations keyed by token form.
///
/// Keys are normalized like tokens on insert, so `"BRB"` and `"brb!"` both
/// register as `brb`. Expansions are kept verbatim; they are appended to the
/// message and tokenized with it.
#[derive(Debug, Clone, Default)]
pub struct Abbreviations {
    map: FxHashMap<String, String>,
}

impl Abbreviations {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an abbreviation. Returns false if the key normalizes to
    /// nothing or the expansion is blank.
    pub fn insert(&mut self, abbreviation: &str, expansion: &str) -> bool {
        let key = WordNormalizer::new(NormalizerConfig::preserving_contractions())
            .normalize(abbreviation);
        let expansion = expansion.trim();
        if key.is_empty() || expansion.is_empty() {
            return false;
        }
        self.map.insert(key, expansion.to_string());
        true
    }

    /// Looks up the expansion for a token.
    #[inline]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Number of abbreviations.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<A: AsRef<str>, E: AsRef<str>> FromIterator<(A, E)> for Abbreviations {
    fn from_iter<T: IntoIterator<Item = (A, E)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (abbreviation, expansion) in iter {
            table.insert(abbreviation.as_ref(), expansion.as_ref());
        }
        table
    }
}
