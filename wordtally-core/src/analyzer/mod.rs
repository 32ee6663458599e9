//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Canonicalizes a single word (NFKC, casefold, punctuation, contractions)
//! - **Tokenizer**: Splits raw text into normalized tokens
//! - **Stemmer**: Reduces a token to the root its inflections share
//! - **Keyword**: Counts occurrences of a keyword and its aliases in text
//!
//! Every stage is a pure function of its input. Nothing here holds mutable
//! state, so all of it is safe to call from any number of threads.

pub mod keyword;
pub mod normalizer;
pub mod stemmer;
pub mod tokenizer;

pub use keyword::{count_occurrences, KeywordMatcher};
pub use normalizer::{normalize, NormalizerConfig, WordNormalizer};
pub use stemmer::{stem, IrregularForms, Stemmer};
pub use tokenizer::{tokenize, Tokenizer};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn stages_are_thread_safe() {
        assert_send_sync::<WordNormalizer>();
        assert_send_sync::<Tokenizer>();
        assert_send_sync::<Stemmer>();
        assert_send_sync::<IrregularForms>();
        assert_send_sync::<KeywordMatcher<'static>>();
    }

    #[test]
    fn default_stemmer_shared_across_threads() {
        let handles: Vec<_> = ["eating", "running", "played", "falling"]
            .into_iter()
            .map(|word| std::thread::spawn(move || stem(word)))
            .collect();
        let stems: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(stems, ["eat", "run", "play", "fal"]);
    }
}
