//! Streaming Tokenizer Module
//!
//! Splits raw message text into normalized tokens. It is the first stage of
//! the counting pipeline: everything downstream (stemming, keyword matching,
//! tallying) consumes its output.
//!
//! ## What It Does
//!
//! Given raw input like `"Hello world! Hello again."`, it emits each word as
//! a normalized token with its position:
//!
//! ```ignore
//! ("hello", 0)
//! ("world", 1)
//! ("hello", 2)
//! ("again", 3)
//! ```
//!
//! ## Extraction Rules
//!
//! A token is a maximal run of either:
//! - ASCII letters/digits, optionally joined by single embedded apostrophes
//!   (`[A-Za-z0-9]+('[A-Za-z0-9]+)*`), or
//! - Devanagari characters (U+0900..=U+097F).
//!
//! Everything else separates tokens. Before scanning, the whole text goes
//! through NFKC and curly-quote unification, so fullwidth letters and
//! `don’t` tokenize like their ASCII forms.
//!
//! Each run is then passed through the [`WordNormalizer`] with contractions
//! preserved, so `"I'm"` yields the token `"i'm"`. Contractions collapse later,
//! when a token is stemmed.
//!
//! ## Usage
//!
//! ```rust
//! use wordtally_core::analyzer::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::new();
//! let mut count = 0;
//!
//! // Tokens are emitted via callback from a reused buffer.
//! tokenizer.tokenize_with("Hello, world!", |token, position| {
//!     count += 1;
//! });
//!
//! assert_eq!(count, 2);
//! ```

use wordtally_types::Token;

use crate::analyzer::normalizer::{
    canonicalize_text, is_devanagari, NormalizerConfig, WordNormalizer,
};

/// Streaming tokenizer: raw text in, normalized tokens out.
///
/// The tokenizer holds no state between calls; it is `Copy` and can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    normalizer: WordNormalizer,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Creates a tokenizer that keeps contractions as written.
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(NormalizerConfig::preserving_contractions())
    }

    /// Creates a tokenizer with a custom per-token normalizer configuration.
    #[inline]
    pub const fn with_config(config: NormalizerConfig) -> Self {
        Self {
            normalizer: WordNormalizer::new(config),
        }
    }

    /// Tokenizes raw text and emits `(token, position)`.
    ///
    /// Positions count emitted tokens, starting at 0. Runs that normalize
    /// to nothing are skipped and do not consume a position. After emitting
    /// a token at position `u32::MAX`, further emissions stop.
    pub fn tokenize_with<F>(&self, text: &str, mut emit: F)
    where
        F: FnMut(&str, u32),
    {
        if text.is_empty() {
            return;
        }

        let canonical = canonicalize_text(text);
        let text: &str = &canonical;
        let mut buf = String::with_capacity(32);
        let mut pos = 0u32;

        for (start, end) in RunScanner::new(text) {
            self.normalizer.normalize_into(&text[start..end], &mut buf);
            if buf.is_empty() {
                continue;
            }
            emit(&buf, pos);
            if pos == u32::MAX {
                return;
            }
            pos += 1;
        }
    }

    /// Tokenizes raw text into an ordered list of tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut out = Vec::new();
        self.tokenize_with(text, |token, _| {
            out.extend(Token::new(token));
        });
        out
    }
}

/// Tokenizes raw text with the default tokenizer.
///
/// ```
/// use wordtally_core::analyzer::tokenize;
///
/// assert_eq!(tokenize("Hello world! Hello again."), ["hello", "world", "hello", "again"]);
/// assert!(tokenize("!!! ... ???").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(text)
}

/// Iterator over the byte ranges of token runs in canonicalized text.
struct RunScanner<'a> {
    text: &'a str,
    i: usize,
}

impl<'a> RunScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, i: 0 }
    }

    /// Consumes `[A-Za-z0-9]+('[A-Za-z0-9]+)*` starting at an ASCII alnum byte.
    fn latin_run(&mut self) -> (usize, usize) {
        let bytes = self.text.as_bytes();
        let start = self.i;
        let mut i = start;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }
            // A single apostrophe only joins when another alnum run follows.
            if i + 1 < bytes.len() && bytes[i] == b'\'' && bytes[i + 1].is_ascii_alphanumeric() {
                i += 1;
                continue;
            }
            break;
        }

        self.i = i;
        (start, i)
    }

    /// Consumes a run of Devanagari characters.
    fn devanagari_run(&mut self) -> (usize, usize) {
        let start = self.i;
        let end = self.text[start..]
            .char_indices()
            .find(|&(_, c)| !is_devanagari(c))
            .map_or(self.text.len(), |(offset, _)| start + offset);
        self.i = end;
        (start, end)
    }
}

impl Iterator for RunScanner<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();

        while self.i < bytes.len() {
            let b = bytes[self.i];
            if b.is_ascii_alphanumeric() {
                return Some(self.latin_run());
            }
            if b < 0x80 {
                self.i += 1;
                continue;
            }

            // `self.i` always sits on a char boundary: ASCII steps are one
            // byte and non-ASCII steps advance by the full char length.
            let c = self.text[self.i..].chars().next()?;
            if is_devanagari(c) {
                return Some(self.devanagari_run());
            }
            self.i += c.len_utf8();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        Tokenizer::new().tokenize_with(input, |text, pos| {
            out.push((text.to_string(), pos));
        });
        out
    }

    #[test]
    fn basic_sentence() {
        assert_eq!(
            tokenize("Hello world! Hello again."),
            ["hello", "world", "hello", "again"]
        );
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(tokenize("").is_empty());
        assert!(collect("").is_empty());
    }

    #[test]
    fn punctuation_only_emits_nothing() {
        assert!(tokenize("!!! ... ???").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("🎉🎉 -- ''").is_empty());
    }

    #[test]
    fn contractions_and_digits() {
        let tokens = tokenize("I'm 19, it's fine. user123");
        assert_eq!(tokens, ["i'm", "19", "it's", "fine", "user123"]);
    }

    #[test]
    fn curly_apostrophes_join() {
        assert_eq!(tokenize("Don’t stop"), ["don't", "stop"]);
    }

    #[test]
    fn lone_apostrophes_split() {
        assert_eq!(tokenize("'quoted' rock''roll"), ["quoted", "rock", "roll"]);
        assert_eq!(tokenize("dogs' bones"), ["dogs", "bones"]);
    }

    #[test]
    fn multiple_embedded_apostrophes() {
        assert_eq!(tokenize("rock'n'roll"), ["rock'n'roll"]);
    }

    #[test]
    fn hyphens_and_underscores_separate() {
        assert_eq!(
            tokenize("abso-lutely snake_case"),
            ["abso", "lutely", "snake", "case"]
        );
    }

    #[test]
    fn accented_letters_separate() {
        // Only ASCII and Devanagari runs are extracted.
        assert_eq!(tokenize("café"), ["caf"]);
    }

    #[test]
    fn fullwidth_letters_fold_to_ascii() {
        assert_eq!(tokenize("ＨＥＬＬＯ there"), ["hello", "there"]);
    }

    #[test]
    fn devanagari_runs() {
        assert_eq!(tokenize("नमस्ते दुनिया!"), ["नमस्ते", "दुनिया"]);
        assert_eq!(tokenize("hello नमस्ते 42"), ["hello", "नमस्ते", "42"]);
    }

    #[test]
    fn devanagari_adjacent_to_latin() {
        assert_eq!(tokenize("abcनमस्ते"), ["abc", "नमस्ते"]);
    }

    #[test]
    fn duplicates_preserved() {
        assert_eq!(tokenize("eat eat EAT"), ["eat", "eat", "eat"]);
    }

    #[test]
    fn positions_are_sequential() {
        let out = collect("the, quick... brown fox!");
        assert_eq!(out.len(), 4);
        for (i, (_, pos)) in out.iter().enumerate() {
            assert_eq!(*pos, i as u32);
        }
    }

    #[test]
    fn tokenizer_is_reusable() {
        let t = Tokenizer::new();

        let mut n = 0usize;
        t.tokenize_with("hello world", |_, _| n += 1);
        assert_eq!(n, 2);

        n = 0;
        t.tokenize_with("one two three", |_, _| n += 1);
        assert_eq!(n, 3);
    }

    #[test]
    fn collapsing_config_collapses_contractions() {
        let t = Tokenizer::with_config(NormalizerConfig::default());
        assert_eq!(t.tokenize("they'd go"), ["they", "go"]);
    }

    #[test]
    fn trailing_apostrophe_at_end_of_input() {
        assert_eq!(tokenize("can'"), ["can"]);
    }
}
