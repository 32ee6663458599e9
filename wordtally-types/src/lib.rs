//! Core types and errors for the wordtally text pipeline.
//!
//! This crate holds the plain data shared by the analyzer and the tally
//! layer. Keeping types separate ensures:
//!
//! - **Clean boundaries**: the analyzer never depends on storage concerns
//! - **Cross-crate compatibility**: callers and the core share the same types
//! - **Cheap values**: everything here is immutable once built

#![warn(missing_docs)]

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;
use std::borrow::Borrow;
use std::time::Duration;

/// A normalized word-like unit extracted from raw text.
///
/// A token is lowercase, NFKC-normalized, has no leading or trailing
/// punctuation, and uses ASCII `'` for any interior apostrophe.
/// It is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Token(Box<str>);

impl Token {
    /// Wraps an already-normalized string.
    ///
    /// Returns `None` for the empty string.
    #[inline]
    pub fn new(normalized: &str) -> Option<Self> {
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized.into()))
        }
    }

    /// Returns the token text.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its text.
    pub fn into_string(self) -> String {
        self.0.into_string()
    }
}

impl Deref for Token {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    #[inline(always)]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A word and how many times it was counted.
///
/// Ordering puts higher counts first, then words alphabetically, so a sorted
/// `Vec<WordCount>` reads as a leaderboard with deterministic ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordCount {
    /// The counted word (a token or a stem).
    pub word: String,
    /// Number of occurrences.
    pub count: u64,
}

impl WordCount {
    /// Creates a new word count.
    #[inline]
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl PartialOrd for WordCount {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WordCount {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        // Primary: count, descending. Secondary: word, ascending.
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.word, self.count)
    }
}

/// How a keyword rule decides that a token is an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MatchMode {
    /// Token and roots are stemmed before comparison ("eating" counts for "eat").
    #[default]
    Stemmed = 0,
    /// Normalized token must equal a root exactly.
    Exact = 1,
    /// A root counts when it starts a word, followed by any ASCII letters.
    /// Catches roots embedded after a hyphen or other separator.
    Embedded = 2,
}

impl MatchMode {
    /// Returns true when this mode tolerates inflectional suffixes.
    #[inline(always)]
    pub const fn tolerates_inflection(self) -> bool {
        !matches!(self, MatchMode::Exact)
    }
}

impl FromStr for MatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "stemmed" | "stem" => Ok(MatchMode::Stemmed),
            "exact" | "literal" => Ok(MatchMode::Exact),
            "1" | "embedded" => Ok(MatchMode::Embedded),
            other => Err(ConfigError::InvalidMatchMode(other.to_string())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Stemmed => "stemmed",
            MatchMode::Exact => "exact",
            MatchMode::Embedded => "embedded",
        })
    }
}

/// A tracked keyword: a literal root plus alias roots and a match mode.
///
/// Rules are cheap to build and are created on demand per lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordRule {
    /// The tracked root term.
    pub keyword: String,
    /// Additional roots counted toward the same keyword.
    pub aliases: Vec<String>,
    /// Inflection tolerance.
    pub mode: MatchMode,
}

impl KeywordRule {
    /// Creates a stemmed rule for `keyword` with no aliases.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            aliases: Vec::new(),
            mode: MatchMode::Stemmed,
        }
    }

    /// Adds alias roots.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the match mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Environment variable read by [`TallyConfig::from_env`] for the match mode.
pub const ENV_MATCH_MODE: &str = "WORDTALLY_MATCH_MODE";

/// Environment variable read by [`TallyConfig::from_env`] for the cache TTL.
pub const ENV_CACHE_TTL_SECS: &str = "WORDTALLY_CACHE_TTL_SECS";

/// Tally configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyConfig {
    /// Default match mode for keyword rules built by the tally.
    pub match_mode: MatchMode,
    /// Lifetime of cached stopword and abbreviation tables.
    pub cache_ttl: Duration,
    /// Whether abbreviation expansions are appended before counting.
    pub expand_abbreviations: bool,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Stemmed,
            cache_ttl: Duration::from_secs(60),
            expand_abbreviations: true,
        }
    }
}

impl TallyConfig {
    /// Whole-token counting with no abbreviation expansion.
    pub const fn strict() -> Self {
        Self {
            match_mode: MatchMode::Exact,
            cache_ttl: Duration::from_secs(60),
            expand_abbreviations: false,
        }
    }

    /// Inside-word matching with abbreviation expansion.
    pub const fn lenient() -> Self {
        Self {
            match_mode: MatchMode::Embedded,
            cache_ttl: Duration::from_secs(60),
            expand_abbreviations: true,
        }
    }

    /// Builds a configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(ENV_MATCH_MODE) {
            config.match_mode = mode.parse()?;
        }

        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            let secs = ttl
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTtl(ttl.clone()))?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Unknown match mode name.
    #[error("invalid match mode: {0:?} (expected stemmed, exact or embedded)")]
    InvalidMatchMode(String),
    /// Cache TTL was not a whole number of seconds.
    #[error("invalid cache ttl: {0:?} (expected whole seconds)")]
    InvalidTtl(String),
}

/// Errors raised while building an irregular-form table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StemmerError {
    /// A table line was not of the form `form = root`.
    #[error("malformed irregular-form entry on line {line}: {content:?}")]
    MalformedLine {
        /// One-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
    /// A form or root normalized to nothing.
    #[error("irregular-form entry {form:?} -> {root:?} normalizes to an empty word")]
    EmptyEntry {
        /// The inflected form as written.
        form: String,
        /// The root as written.
        root: String,
    },
    /// A root would itself be changed by suffix stripping.
    #[error("irregular root {root:?} is not stable: it stems to {stems_to:?}")]
    UnstableRoot {
        /// The normalized root.
        root: String,
        /// What the suffix cascade turns it into.
        stems_to: String,
    },
    /// A root is also listed as a form that maps elsewhere.
    #[error("irregular root {root:?} is itself mapped to {next:?}")]
    ChainedRoot {
        /// The normalized root.
        root: String,
        /// The root it would map to in turn.
        next: String,
    },
    /// The table file could not be read.
    #[error("failed to read irregular-form table: {0}")]
    Io(String),
}

/// Errors raised while compiling a keyword rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeywordError {
    /// The keyword normalizes to nothing.
    #[error("keyword {0:?} is empty after normalization")]
    EmptyKeyword(String),
    /// The embedded-match pattern could not be built.
    #[error("invalid keyword pattern: {0}")]
    Pattern(String),
}

/// Errors raised by a key-count store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A counter would exceed `u64::MAX`.
    #[error("count overflow for {word:?} in scope {scope}")]
    Overflow {
        /// Store scope.
        scope: u64,
        /// Word whose counter overflowed.
        word: String,
    },
    /// The backing store rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejects_empty() {
        assert!(Token::new("").is_none());
        assert_eq!(Token::new("hello").map(Token::into_string), Some("hello".into()));
    }

    #[test]
    fn token_compares_with_str() {
        let tokens = vec![Token::new("hello").unwrap(), Token::new("world").unwrap()];
        assert_eq!(tokens, ["hello", "world"]);
        assert_eq!(tokens[0].len(), 5);
    }

    #[test]
    fn word_count_orders_by_count_then_word() {
        let mut counts = vec![
            WordCount::new("beta", 2),
            WordCount::new("alpha", 2),
            WordCount::new("gamma", 5),
        ];
        counts.sort();
        let words: Vec<_> = counts.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, ["gamma", "alpha", "beta"]);
    }

    #[test]
    fn match_mode_parses_legacy_numbers() {
        assert_eq!("0".parse::<MatchMode>(), Ok(MatchMode::Stemmed));
        assert_eq!("1".parse::<MatchMode>(), Ok(MatchMode::Embedded));
        assert_eq!(" Exact ".parse::<MatchMode>(), Ok(MatchMode::Exact));
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn inflection_tolerance() {
        assert!(MatchMode::Stemmed.tolerates_inflection());
        assert!(MatchMode::Embedded.tolerates_inflection());
        assert!(!MatchMode::Exact.tolerates_inflection());
    }

    #[test]
    fn keyword_rule_builder() {
        let rule = KeywordRule::new("eat")
            .with_aliases(["munch", "chow"])
            .with_mode(MatchMode::Exact);
        assert_eq!(rule.keyword, "eat");
        assert_eq!(rule.aliases, ["munch", "chow"]);
        assert_eq!(rule.mode, MatchMode::Exact);
    }

    #[test]
    fn config_from_lookup() {
        let config = TallyConfig::from_lookup(|key| match key {
            ENV_MATCH_MODE => Some("embedded".into()),
            ENV_CACHE_TTL_SECS => Some("5".into()),
            _ => None,
        })
        .expect("valid config");
        assert_eq!(config.match_mode, MatchMode::Embedded);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert!(config.expand_abbreviations);
    }

    #[test]
    fn config_defaults_when_unset() {
        let config = TallyConfig::from_lookup(|_| None).expect("valid config");
        assert_eq!(config, TallyConfig::default());
    }

    #[test]
    fn config_rejects_bad_ttl() {
        let err = TallyConfig::from_lookup(|key| {
            (key == ENV_CACHE_TTL_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTtl("soon".into()));
    }

    #[test]
    fn error_messages() {
        let err = StemmerError::MalformedLine {
            line: 3,
            content: "ate eat".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed irregular-form entry on line 3: \"ate eat\""
        );
    }
}
