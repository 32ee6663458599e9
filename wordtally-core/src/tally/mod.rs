//! Message tallying on top of the analyzer.
//!
//! A message is tokenized, abbreviations are expanded, stopwords are dropped
//! and the remaining words are counted. Counts go to an external
//! [`KeyCountStore`] under an opaque [`Scope`].
//!
//! Per-scope tables (stopwords, abbreviations) are looked up on every message
//! and change rarely; [`LookupCache`] keeps them for the configured TTL.
//!
//! Threading:
//! - [`WordTally`] holds a reusable expansion buffer and running statistics,
//!   so it takes `&mut self` to ingest. Use one per worker.

mod abbreviations;
mod api;
mod cache;
mod stats;
mod stopwords;
mod store;
mod types;

pub use abbreviations::Abbreviations;
pub use cache::LookupCache;
pub use stats::TallyStats;
pub use stopwords::{Stopwords, CORE_STOPWORDS};
pub use store::{KeyCountStore, MemoryStore, Scope};
pub use types::WordTally;
