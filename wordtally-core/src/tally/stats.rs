//! Statistics and TallyStats.

use crate::tally::types::WordTally;

/// A snapshot of tally counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyStats {
    /// Non-blank messages ingested.
    pub messages: u64,
    /// Tokens produced, including stopwords and expansion tokens.
    pub tokens_seen: u64,
    /// Tokens that reached a counter.
    pub tokens_counted: u64,
    /// Tokens dropped as stopwords.
    pub stopwords_skipped: u64,
    /// Abbreviations expanded.
    pub abbreviations_expanded: u64,
}

impl WordTally {
    /// Returns tally statistics.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> TallyStats {
        self.stats
    }

    /// Resets all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = TallyStats::default();
    }
}

impl TallyStats {
    /// Fraction of seen tokens that were counted, in `[0, 1]`.
    pub fn counted_ratio(&self) -> f64 {
        if self.tokens_seen == 0 {
            return 0.0;
        }
        self.tokens_counted as f64 / self.tokens_seen as f64
    }

    /// Average tokens per message.
    pub fn tokens_per_message(&self) -> f64 {
        if self.messages == 0 {
            return 0.0;
        }
        self.tokens_seen as f64 / self.messages as f64
    }
}

impl core::fmt::Display for TallyStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} messages, {} tokens, {} counted ({:.1}%), {} stopwords",
            self.messages,
            self.tokens_seen,
            self.tokens_counted,
            self.counted_ratio() * 100.0,
            self.stopwords_skipped
        )?;

        if self.abbreviations_expanded > 0 {
            write!(f, ", {} expansions", self.abbreviations_expanded)?;
        }

        Ok(())
    }
}
