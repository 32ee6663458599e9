//! Public API for counting messages.

use rustc_hash::FxHashMap;
use tracing::debug;
use wordtally_types::{KeywordError, KeywordRule, MatchMode, StoreError, Token, WordCount};

use crate::analyzer::keyword::KeywordMatcher;
use crate::tally::abbreviations::Abbreviations;
use crate::tally::stopwords::Stopwords;
use crate::tally::store::{KeyCountStore, Scope};
use crate::tally::types::WordTally;

impl WordTally {
    /// Counts the words of one message.
    ///
    /// Tokens with an abbreviation entry have their expansion appended to the
    /// message before counting, so both the short and the long form are
    /// counted. Stopwords are skipped. Blank messages count nothing.
    ///
    /// Returns one [`WordCount`] per distinct word, highest count first.
    pub fn ingest(
        &mut self,
        text: &str,
        stopwords: &Stopwords,
        abbreviations: &Abbreviations,
    ) -> Vec<WordCount> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let tokenizer = self.tokenizer;
        let mut expanded = 0u64;

        self.expand_buf.clear();
        self.expand_buf.push_str(text);
        if self.config.expand_abbreviations && !abbreviations.is_empty() {
            let buf = &mut self.expand_buf;
            tokenizer.tokenize_with(text, |token, _| {
                if let Some(expansion) = abbreviations.get(token) {
                    buf.push(' ');
                    buf.push_str(expansion);
                    expanded += 1;
                }
            });
        }

        let mut counts: FxHashMap<String, u64> = FxHashMap::default();
        let mut seen = 0u64;
        let mut skipped = 0u64;

        tokenizer.tokenize_with(&self.expand_buf, |token, _| {
            seen += 1;
            if stopwords.contains(token) {
                skipped += 1;
                return;
            }
            match counts.get_mut(token) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(token.to_string(), 1);
                }
            }
        });

        self.stats.messages += 1;
        self.stats.tokens_seen += seen;
        self.stats.tokens_counted += seen - skipped;
        self.stats.stopwords_skipped += skipped;
        self.stats.abbreviations_expanded += expanded;

        let mut out: Vec<WordCount> = counts
            .into_iter()
            .map(|(word, count)| WordCount::new(word, count))
            .collect();
        out.sort_unstable();

        debug!(
            target: "wordtally::tally",
            tokens = seen,
            distinct = out.len(),
            stopwords = skipped,
            expanded,
            "Ingested message"
        );

        out
    }

    /// Counts a message and adds the result to `store` under `scope`.
    ///
    /// # Errors
    ///
    /// Stops at the first store error. Counters already written stay written.
    pub fn record<S>(
        &mut self,
        store: &mut S,
        scope: Scope,
        text: &str,
        stopwords: &Stopwords,
        abbreviations: &Abbreviations,
    ) -> Result<Vec<WordCount>, StoreError>
    where
        S: KeyCountStore + ?Sized,
    {
        let counts = self.ingest(text, stopwords, abbreviations);
        for wc in &counts {
            store.increment(scope, &wc.word, wc.count)?;
        }
        Ok(counts)
    }

    /// Builds a rule for `keyword` using the configured match mode.
    pub fn rule_for<I, S>(&self, keyword: &str, aliases: I) -> KeywordRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordRule::new(keyword)
            .with_aliases(aliases)
            .with_mode(self.config.match_mode)
    }

    /// Counts every rule in one message.
    ///
    /// The message is tokenized once and shared by all stemmed and exact
    /// rules. Rules with no occurrence are left out; the rest are returned
    /// highest count first, keyed by the prepared keyword.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails to compile.
    pub fn keyword_counts(
        &self,
        text: &str,
        rules: &[KeywordRule],
    ) -> Result<Vec<WordCount>, KeywordError> {
        let mut tokens: Option<Vec<Token>> = None;
        let mut out = Vec::new();

        for rule in rules {
            let matcher = KeywordMatcher::compile(rule, &self.stemmer)?;
            let hits = match matcher.mode() {
                MatchMode::Embedded => matcher.count(text),
                MatchMode::Stemmed | MatchMode::Exact => {
                    let tokens = tokens.get_or_insert_with(|| self.tokenizer.tokenize(text));
                    matcher.count_tokens(tokens)
                }
            };
            if hits > 0 {
                out.push(WordCount::new(matcher.keyword(), hits as u64));
            }
        }

        out.sort_unstable();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::store::MemoryStore;
    use wordtally_types::TallyConfig;

    fn words(counts: &[WordCount]) -> Vec<(&str, u64)> {
        counts.iter().map(|c| (c.word.as_str(), c.count)).collect()
    }

    #[test]
    fn ingest_counts_and_skips_stopwords() {
        let mut tally = WordTally::new();
        let counts = tally.ingest(
            "The pizza, THE pizza! I'm getting pizza.",
            &Stopwords::core(),
            &Abbreviations::new(),
        );
        assert_eq!(words(&counts), [("pizza", 3), ("getting", 1)]);

        let stats = tally.stats();
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.tokens_seen, 7);
        assert_eq!(stats.stopwords_skipped, 3);
        assert_eq!(stats.tokens_counted, 4);
    }

    #[test]
    fn ingest_blank_message() {
        let mut tally = WordTally::new();
        assert!(tally
            .ingest("   \n\t", &Stopwords::core(), &Abbreviations::new())
            .is_empty());
        assert_eq!(tally.stats().messages, 0);
    }

    #[test]
    fn abbreviations_are_expanded() {
        let abbreviations: Abbreviations = [("gg", "good game")].into_iter().collect();
        let mut tally = WordTally::new();

        let counts = tally.ingest("GG gg", &Stopwords::core(), &abbreviations);
        assert_eq!(words(&counts), [("game", 2), ("gg", 2), ("good", 2)]);
        assert_eq!(tally.stats().abbreviations_expanded, 2);
    }

    #[test]
    fn expansion_can_be_disabled() {
        let abbreviations: Abbreviations = [("gg", "good game")].into_iter().collect();
        let mut tally = WordTally::with_config(TallyConfig::strict());

        let counts = tally.ingest("gg", &Stopwords::core(), &abbreviations);
        assert_eq!(words(&counts), [("gg", 1)]);
        assert_eq!(tally.stats().abbreviations_expanded, 0);
    }

    #[test]
    fn record_writes_to_store() {
        let mut tally = WordTally::new();
        let mut store = MemoryStore::new();
        let stop = Stopwords::core();
        let abbr = Abbreviations::new();

        tally
            .record(&mut store, 9, "rust rust go", &stop, &abbr)
            .unwrap();
        tally.record(&mut store, 9, "Rust!", &stop, &abbr).unwrap();

        assert_eq!(store.count(9, "rust"), Ok(3));
        assert_eq!(store.count(9, "go"), Ok(1));
        assert_eq!(words(&store.top(9, 1).unwrap()), [("rust", 3)]);
    }

    #[test]
    fn record_stops_on_overflow() {
        let mut tally = WordTally::new();
        let mut store = MemoryStore::new();
        store.increment(1, "rust", u64::MAX).unwrap();

        let err = tally
            .record(&mut store, 1, "rust", &Stopwords::none(), &Abbreviations::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::Overflow { .. }));
    }

    #[test]
    fn keyword_counts_per_mode() {
        let text = "Eating pizza, ate pizza-pie, pizzas everywhere";

        let tally = WordTally::new();
        let rules = [
            tally.rule_for("eat", Vec::<String>::new()),
            tally.rule_for("pizza", Vec::<String>::new()),
            tally.rule_for("salad", Vec::<String>::new()),
        ];
        let counts = tally.keyword_counts(text, &rules).unwrap();
        assert_eq!(words(&counts), [("pizza", 3), ("eat", 2)]);

        let tally = WordTally::with_config(TallyConfig::strict());
        let rules = [tally.rule_for("pizza", Vec::<String>::new())];
        let counts = tally.keyword_counts(text, &rules).unwrap();
        assert_eq!(words(&counts), [("pizza", 2)]);

        let tally = WordTally::with_config(TallyConfig::lenient());
        let rules = [tally.rule_for("pizz", Vec::<String>::new())];
        let counts = tally.keyword_counts(text, &rules).unwrap();
        assert_eq!(words(&counts), [("pizz", 3)]);
    }

    #[test]
    fn keyword_counts_rejects_empty_rule() {
        let tally = WordTally::new();
        let rules = [tally.rule_for("!!!", Vec::<String>::new())];
        assert!(matches!(
            tally.keyword_counts("anything", &rules),
            Err(KeywordError::EmptyKeyword(_))
        ));
    }
}
