//! Word and keyword counting for chat messages.
//!
//! The [`analyzer`] module turns raw text into normalized tokens and stems;
//! the [`tally`] module aggregates them into per-scope counts against an
//! external key-count store.
//!
//! ```
//! use wordtally_core::{count_occurrences, normalize, stem, tokenize};
//!
//! assert_eq!(tokenize("Hello world! Hello again."), ["hello", "world", "hello", "again"]);
//! assert_eq!(normalize("they'd"), "they");
//! assert_eq!(stem("played"), "play");
//! assert_eq!(count_occurrences("eating, ate, eaten", "eat", ["munch"]), 3);
//! ```

pub mod analyzer;
pub mod tally;

pub use analyzer::{count_occurrences, normalize, stem, tokenize};
pub use wordtally_types::{KeywordRule, MatchMode, TallyConfig, Token, WordCount};
