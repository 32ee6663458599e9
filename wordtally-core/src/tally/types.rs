//! Tally type.

use wordtally_types::TallyConfig;

use crate::analyzer::stemmer::Stemmer;
use crate::analyzer::tokenizer::Tokenizer;
use crate::tally::stats::TallyStats;

/// Per-message word counter.
///
/// Owns the tokenizer, the stemmer used for keyword rules and running
/// statistics. Stopword and abbreviation tables are passed per call, since
/// they vary by scope and are usually served from a
/// [`LookupCache`](crate::tally::LookupCache).
#[derive(Debug, Clone)]
pub struct WordTally {
    pub(crate) config: TallyConfig,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) stemmer: Stemmer,
    pub(crate) stats: TallyStats,
    /// Reusable buffer for abbreviation expansion.
    pub(crate) expand_buf: String,
}

impl Default for WordTally {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTally {
    /// Creates a tally with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TallyConfig::default())
    }

    /// Creates a tally with a custom configuration.
    pub fn with_config(config: TallyConfig) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(),
            stemmer: Stemmer::default(),
            stats: TallyStats::default(),
            expand_buf: String::with_capacity(256),
        }
    }

    /// Replaces the stemmer used to compile keyword rules.
    pub fn with_stemmer(mut self, stemmer: Stemmer) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Returns the active configuration.
    #[inline(always)]
    #[must_use]
    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    /// Returns the stemmer used for keyword rules.
    #[inline(always)]
    #[must_use]
    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }
}
