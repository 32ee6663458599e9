//! Keyword matching.
//!
//! A [`KeywordRule`] names a tracked root plus aliases. Compiling it against a
//! [`Stemmer`] produces a [`KeywordMatcher`] that counts occurrences in raw
//! text. Rules are built per lookup; nothing here is cached globally.

use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use tracing::debug;
use wordtally_types::{KeywordError, KeywordRule, MatchMode, Token};

use crate::analyzer::normalizer::{canonicalize_text, NormalizerConfig, WordNormalizer};
use crate::analyzer::stemmer::{default_stemmer, Stemmer};
use crate::analyzer::tokenizer::Tokenizer;

/// Upper bound on the compiled size of an embedded-match pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone)]
enum Roots {
    /// Stems (stemmed mode) or normalized words (exact mode).
    Words(SmallVec<[String; 4]>),
    /// Boundary-anchored alternation of the roots.
    Pattern(Regex),
}

/// A compiled keyword rule.
///
/// # Example
///
/// ```
/// use wordtally_core::analyzer::keyword::KeywordMatcher;
/// use wordtally_core::analyzer::stemmer::default_stemmer;
/// use wordtally_types::KeywordRule;
///
/// let rule = KeywordRule::new("eat").with_aliases(["munch"]);
/// let matcher = KeywordMatcher::compile(&rule, default_stemmer()).unwrap();
///
/// assert_eq!(matcher.count("Eating, munching, and more eating."), 3);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordMatcher<'s> {
    keyword: String,
    mode: MatchMode,
    roots: Roots,
    stemmer: &'s Stemmer,
    tokenizer: Tokenizer,
}

impl<'s> KeywordMatcher<'s> {
    /// Compiles a rule.
    ///
    /// Stemmed rules stem the keyword and every alias; exact rules normalize
    /// them; embedded rules build a case-insensitive boundary pattern.
    /// Aliases that normalize to nothing are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KeywordError::EmptyKeyword`] if the keyword normalizes to
    /// nothing, and [`KeywordError::Pattern`] if the embedded pattern cannot
    /// be built.
    pub fn compile(rule: &KeywordRule, stemmer: &'s Stemmer) -> Result<Self, KeywordError> {
        let literal = WordNormalizer::new(NormalizerConfig::preserving_contractions());

        let prepare = |word: &str| match rule.mode {
            MatchMode::Stemmed => stemmer.stem(word),
            MatchMode::Exact | MatchMode::Embedded => literal.normalize(word),
        };

        let keyword = prepare(&rule.keyword);
        if keyword.is_empty() {
            return Err(KeywordError::EmptyKeyword(rule.keyword.clone()));
        }

        let mut words: SmallVec<[String; 4]> = SmallVec::new();
        words.push(keyword.clone());
        for alias in &rule.aliases {
            let root = prepare(alias);
            if !root.is_empty() && !words.contains(&root) {
                words.push(root);
            }
        }

        debug!(
            target: "wordtally::keyword",
            keyword = %keyword,
            roots = words.len(),
            mode = %rule.mode,
            "Compiled keyword rule"
        );

        let roots = match rule.mode {
            MatchMode::Stemmed | MatchMode::Exact => Roots::Words(words),
            MatchMode::Embedded => Roots::Pattern(embedded_pattern(&words)?),
        };

        Ok(Self {
            keyword,
            mode: rule.mode,
            roots,
            stemmer,
            tokenizer: Tokenizer::new(),
        })
    }

    /// The prepared keyword (its stem in stemmed mode).
    #[inline]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The rule's match mode.
    #[inline]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns true if a single token is an occurrence.
    ///
    /// In embedded mode this checks whether the token starts with a root.
    pub fn matches(&self, token: &str) -> bool {
        match &self.roots {
            Roots::Words(words) => {
                let prepared = match self.mode {
                    MatchMode::Stemmed => self.stemmer.stem(token),
                    _ => token.to_string(),
                };
                words.contains(&prepared)
            }
            Roots::Pattern(pattern) => pattern.is_match(token),
        }
    }

    /// Counts every occurrence in raw text.
    ///
    /// Repeated occurrences all count; the result is a sum, not a presence flag.
    pub fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        match &self.roots {
            Roots::Words(_) => {
                let mut hits = 0usize;
                self.tokenizer.tokenize_with(text, |token, _| {
                    if self.matches(token) {
                        hits += 1;
                    }
                });
                hits
            }
            Roots::Pattern(pattern) => pattern.find_iter(&canonicalize_text(text)).count(),
        }
    }

    /// Counts occurrences in already-tokenized text.
    ///
    /// Lets a caller tokenize a message once and test many keywords.
    /// Embedded rules look at each token on its own, so roots after a hyphen
    /// are not seen here; use [`KeywordMatcher::count`] for those.
    pub fn count_tokens(&self, tokens: &[Token]) -> usize {
        tokens.iter().filter(|t| self.matches(t)).count()
    }
}

/// Builds `(?:^|[^a-z0-9])(?:root1|root2|...)[a-z]*`, case-insensitive.
///
/// The leading class consumes the boundary character; consecutive matches
/// never share one because each match ends on a non-letter.
fn embedded_pattern(words: &[String]) -> Result<Regex, KeywordError> {
    let mut alts: Vec<&str> = words.iter().map(String::as_str).collect();
    // Longest first so a longer alias wins over its prefix.
    alts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let group = alts
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!("(?:^|[^a-z0-9])(?:{group})[a-z]*"))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| KeywordError::Pattern(e.to_string()))
}

/// Counts occurrences of `keyword` and its aliases in `text` using stemmed
/// matching and the default stemmer.
///
/// Returns 0 for empty text or a keyword that normalizes to nothing.
///
/// ```
/// use wordtally_core::analyzer::count_occurrences;
///
/// let text = "I was eating while you ate and they were eating too";
/// assert_eq!(count_occurrences(text, "eat", &[] as &[&str]), 3);
/// ```
pub fn count_occurrences<I, S>(text: &str, keyword: &str, aliases: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if text.is_empty() || keyword.is_empty() {
        return 0;
    }

    let rule = KeywordRule::new(keyword)
        .with_aliases(aliases.into_iter().map(|a| a.as_ref().to_string()));

    match KeywordMatcher::compile(&rule, default_stemmer()) {
        Ok(matcher) => matcher.count(text),
        Err(KeywordError::EmptyKeyword(_)) => 0,
        Err(e) => {
            // Stemmed rules never build a pattern.
            debug!(target: "wordtally::keyword", error = %e, "Keyword rule rejected");
            0
        }
    }
}

/// Splits user input on whitespace and commas and normalizes each word.
///
/// Words that normalize to nothing are dropped.
///
/// ```
/// use wordtally_core::analyzer::keyword::parse_keyword_list;
///
/// assert_eq!(parse_keyword_list("Pizza, TACOS\n  they'd,,"), ["pizza", "tacos", "they"]);
/// ```
pub fn parse_keyword_list(input: &str) -> Vec<String> {
    let normalizer = WordNormalizer::default();
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|part| normalizer.normalize(part))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Formats a keyword for display.
///
/// All-uppercase words (acronyms) are kept as-is; anything else is
/// title-cased.
pub fn display_keyword(keyword: &str) -> String {
    let mut chars = keyword.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let has_cased = keyword.chars().any(|c| c.is_uppercase() || c.is_lowercase());
    if has_cased && !keyword.chars().any(char::is_lowercase) {
        return keyword.to_string();
    }

    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
}
