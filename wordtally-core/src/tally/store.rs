//! Key-count store seam.
//!
//! Persistence lives outside this crate. The tally only needs to add to a
//! per-scope word counter and read counters back; [`KeyCountStore`] is that
//! contract. [`MemoryStore`] backs tests and the benchmark binary.

use rustc_hash::FxHashMap;
use wordtally_types::{StoreError, WordCount};

/// Opaque aggregation scope (for example a hash of server, channel and user).
pub type Scope = u64;

/// An external word-count store.
///
/// Implementations own their own concurrency control; a typical backend
/// upserts with single-writer-per-key semantics.
pub trait KeyCountStore {
    /// Adds `by` to the counter for `word` in `scope` and returns the new total.
    fn increment(&mut self, scope: Scope, word: &str, by: u64) -> Result<u64, StoreError>;

    /// Returns the counter for `word` in `scope` (0 if absent).
    fn count(&self, scope: Scope, word: &str) -> Result<u64, StoreError>;

    /// Returns the `n` highest counters in `scope`, highest first.
    fn top(&self, scope: Scope, n: usize) -> Result<Vec<WordCount>, StoreError>;

    /// Removes the counter for `word` in `scope` and returns what it held.
    fn purge(&mut self, scope: Scope, word: &str) -> Result<u64, StoreError>;
}

/// In-memory [`KeyCountStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scopes: FxHashMap<Scope, FxHashMap<String, u64>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words stored in `scope`.
    pub fn words_in(&self, scope: Scope) -> usize {
        self.scopes.get(&scope).map_or(0, FxHashMap::len)
    }
}

impl KeyCountStore for MemoryStore {
    fn increment(&mut self, scope: Scope, word: &str, by: u64) -> Result<u64, StoreError> {
        let words = self.scopes.entry(scope).or_default();

        let slot = match words.get_mut(word) {
            Some(slot) => slot,
            None => words.entry(word.to_string()).or_insert(0),
        };

        *slot = slot.checked_add(by).ok_or_else(|| StoreError::Overflow {
            scope,
            word: word.to_string(),
        })?;
        Ok(*slot)
    }

    fn count(&self, scope: Scope, word: &str) -> Result<u64, StoreError> {
        Ok(self
            .scopes
            .get(&scope)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0))
    }

    fn top(&self, scope: Scope, n: usize) -> Result<Vec<WordCount>, StoreError> {
        let Some(words) = self.scopes.get(&scope) else {
            return Ok(Vec::new());
        };

        let mut all: Vec<WordCount> = words
            .iter()
            .map(|(word, &count)| WordCount::new(word.as_str(), count))
            .collect();
        all.sort_unstable();
        all.truncate(n);
        Ok(all)
    }

    fn purge(&mut self, scope: Scope, word: &str) -> Result<u64, StoreError> {
        Ok(self
            .scopes
            .get_mut(&scope)
            .and_then(|words| words.remove(word))
            .unwrap_or(0))
    }
}
