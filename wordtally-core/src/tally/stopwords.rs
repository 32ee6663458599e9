//! Stopwords: words that are never counted.

use rustc_hash::FxHashSet;

use crate::analyzer::normalizer::{NormalizerConfig, WordNormalizer};

/// Built-in English stopwords, in token form (contractions as written).
#[rustfmt::skip]
pub const CORE_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "can't", "cannot", "could",
    "couldn't", "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down",
    "during", "each", "few", "for", "from", "further", "had", "hadn't", "has",
    "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
    "let's", "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so",
    "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "these", "they", "they'd", "they'll",
    "they're", "they've", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "won't", "would", "wouldn't", "you", "you'd", "you'll",
    "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// A stopword set: the core list plus per-scope extras.
///
/// Lookups take tokens as the tokenizer emits them (normalized,
/// contractions preserved).
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: FxHashSet<String>,
    extra: usize,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::core()
    }
}

impl Stopwords {
    /// The built-in list only.
    pub fn core() -> Self {
        Self {
            words: CORE_STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
            extra: 0,
        }
    }

    /// An empty set; every token counts.
    pub fn none() -> Self {
        Self {
            words: FxHashSet::default(),
            extra: 0,
        }
    }

    /// Adds per-scope stopwords. Each word is normalized the way the
    /// tokenizer normalizes tokens; words that normalize to nothing are skipped.
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalizer = WordNormalizer::new(NormalizerConfig::preserving_contractions());
        for word in words {
            let word = normalizer.normalize(word.as_ref());
            if !word.is_empty() && self.words.insert(word) {
                self.extra += 1;
            }
        }
        self
    }

    /// Returns true if `token` is a stopword.
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Total number of stopwords.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of stopwords added on top of the base set.
    #[inline]
    pub fn extra_len(&self) -> usize {
        self.extra
    }
}
