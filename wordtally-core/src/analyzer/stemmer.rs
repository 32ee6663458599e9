//! Conservative English suffix-stripping stemmer.
//!
//! Merges common inflections ("plays", "played", "playing") onto one root so
//! they count as the same word. The rule cascade is deliberately small:
//!
//! 1. An irregular-form table wins unconditionally (`ate`, `eaten` -> `eat`).
//! 2. Words of three characters or fewer are left alone (`is`, `ads`).
//! 3. Plural / third person: `-ies` -> `-y`, else drop `-es`, else drop `-s`.
//! 4. Gerund / past tense: drop `-ing`, else drop `-ed`; then undouble a final
//!    consonant (`running` -> `run`, `falling` -> `fal`). Doubled vowels stay.
//!
//! The cascade repeats until the word stops changing, so `stem` is
//! idempotent. Every pass shortens the word, which bounds the loop.
//!
//! This is a heuristic, not a dictionary stemmer. Irregular words missing from
//! the table are under-stemmed ("went" stays "went") and some words are
//! over-stemmed ("glasses" and "glass" both become "gla"). Both are accepted
//! merge behavior for counting, not errors.

use std::path::Path;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use tracing::info;
use wordtally_types::StemmerError;

use crate::analyzer::normalizer::WordNormalizer;

/// Words at or below this many characters are never suffix-stripped.
pub const MIN_STEM_LEN: usize = 3;

/// Built-in irregular forms.
pub const DEFAULT_IRREGULAR: &[(&str, &str)] = &[
    ("ate", "eat"),
    ("eaten", "eat"),
    ("eating", "eat"),
];

static DEFAULT_STEMMER: LazyLock<Stemmer> = LazyLock::new(Stemmer::default);

/// Irregular inflected forms mapped to their roots.
///
/// Forms and roots are stored normalized. Every root is validated to be a
/// fixed point of the stemmer, which keeps `stem` idempotent no matter what
/// the table holds.
#[derive(Debug, Clone)]
pub struct IrregularForms {
    map: FxHashMap<String, String>,
    normalizer: WordNormalizer,
}

impl Default for IrregularForms {
    fn default() -> Self {
        let map = DEFAULT_IRREGULAR
            .iter()
            .map(|&(form, root)| (form.to_string(), root.to_string()))
            .collect();
        Self {
            map,
            normalizer: WordNormalizer::default(),
        }
    }
}

impl IrregularForms {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
            normalizer: WordNormalizer::default(),
        }
    }

    /// Parses a table from `form = root` lines.
    ///
    /// Blank lines and lines starting with `#` are ignored. The result
    /// contains only the parsed entries; use [`IrregularForms::extend_from_str`]
    /// to add to the built-in table instead.
    ///
    /// # Errors
    ///
    /// Returns [`StemmerError`] for malformed lines or entries that would make
    /// stemming unstable.
    pub fn parse(text: &str) -> Result<Self, StemmerError> {
        let mut forms = Self::empty();
        forms.extend_from_str(text)?;
        Ok(forms)
    }

    /// Reads a table file and adds its entries to the built-in table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StemmerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StemmerError::Io(format!("{}: {e}", path.display())))?;

        let mut forms = Self::default();
        let added = forms.extend_from_str(&text)?;
        info!(
            target: "wordtally::stemmer",
            path = %path.display(),
            added,
            total = forms.len(),
            "Loaded irregular-form table"
        );
        Ok(forms)
    }

    /// Adds `form = root` lines to this table and returns how many were added.
    pub fn extend_from_str(&mut self, text: &str) -> Result<usize, StemmerError> {
        let mut added = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || StemmerError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            };

            let (form, root) = line.split_once('=').ok_or_else(malformed)?;
            let (form, root) = (form.trim(), root.trim());
            if form.is_empty() || root.is_empty() {
                return Err(malformed());
            }

            self.insert(form, root)?;
            added += 1;
        }

        Ok(added)
    }

    /// Adds a single irregular form.
    ///
    /// # Errors
    ///
    /// - [`StemmerError::EmptyEntry`] if either side normalizes to nothing
    /// - [`StemmerError::UnstableRoot`] if suffix stripping would change `root`
    /// - [`StemmerError::ChainedRoot`] if `root` maps elsewhere, or `form` is
    ///   already used as a root
    pub fn insert(&mut self, form: &str, root: &str) -> Result<(), StemmerError> {
        let form_n = self.normalizer.normalize(form);
        let root_n = self.normalizer.normalize(root);

        if form_n.is_empty() || root_n.is_empty() {
            return Err(StemmerError::EmptyEntry {
                form: form.to_string(),
                root: root.to_string(),
            });
        }

        if let Some(stripped) = strip_once(&root_n) {
            return Err(StemmerError::UnstableRoot {
                root: root_n,
                stems_to: stripped,
            });
        }

        if let Some(next) = self.map.get(&root_n).filter(|next| **next != root_n) {
            return Err(StemmerError::ChainedRoot {
                root: root_n,
                next: next.clone(),
            });
        }

        if form_n != root_n && self.map.values().any(|existing| *existing == form_n) {
            return Err(StemmerError::ChainedRoot {
                root: form_n,
                next: root_n,
            });
        }

        self.map.insert(form_n, root_n);
        Ok(())
    }

    /// Returns the root for a normalized form.
    #[inline]
    pub fn get(&self, form: &str) -> Option<&str> {
        self.map.get(form).map(String::as_str)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Suffix-stripping stemmer with an irregular-form table.
#[derive(Debug, Clone, Default)]
pub struct Stemmer {
    forms: IrregularForms,
    normalizer: WordNormalizer,
}

impl Stemmer {
    /// Creates a stemmer with a custom irregular-form table.
    pub fn new(forms: IrregularForms) -> Self {
        Self {
            forms,
            normalizer: WordNormalizer::default(),
        }
    }

    /// Returns the irregular-form table.
    #[inline]
    pub fn irregular_forms(&self) -> &IrregularForms {
        &self.forms
    }

    /// Reduces a word to its root.
    ///
    /// The word is normalized first (including contraction collapse), so raw
    /// tokens and user input can be passed directly.
    pub fn stem(&self, word: &str) -> String {
        let mut current = self.normalizer.normalize(word);

        loop {
            if let Some(root) = self.forms.get(&current) {
                return root.to_string();
            }

            let Some(stripped) = strip_once(&current) else {
                return current;
            };

            let next = self.normalizer.normalize(&stripped);
            if next.len() >= current.len() {
                return next;
            }
            current = next;
        }
    }
}

/// Stems a word with the default stemmer.
///
/// ```
/// use wordtally_core::analyzer::stem;
///
/// assert_eq!(stem("eating"), "eat");
/// assert_eq!(stem("running"), "run");
/// assert_eq!(stem("is"), "is");
/// ```
pub fn stem(token: &str) -> String {
    DEFAULT_STEMMER.stem(token)
}

/// Returns the default stemmer shared by the free functions.
pub fn default_stemmer() -> &'static Stemmer {
    &DEFAULT_STEMMER
}

/// Applies one pass of the suffix cascade.
///
/// Returns `None` when no rule fires.
fn strip_once(word: &str) -> Option<String> {
    let mut n = word.chars().count();
    if n <= MIN_STEM_LEN {
        return None;
    }

    let mut w = word.to_string();

    if w.ends_with("ies") && n > 4 {
        w.truncate(w.len() - 3);
        w.push('y');
        n -= 2;
    } else if w.ends_with("es") && n > 4 {
        w.truncate(w.len() - 2);
        n -= 2;
    } else if w.ends_with('s') && n > 3 {
        w.truncate(w.len() - 1);
        n -= 1;
    }

    if w.ends_with("ing") && n > 5 {
        w.truncate(w.len() - 3);
        undouble(&mut w);
    } else if w.ends_with("ed") && n > 4 {
        w.truncate(w.len() - 2);
        undouble(&mut w);
    }

    (w.len() < word.len()).then_some(w)
}

/// Drops the last letter of a doubled final consonant (`runn` -> `run`).
fn undouble(w: &mut String) {
    let &[.., a, b] = w.as_bytes() else {
        return;
    };

    let vowel = matches!(b, b'a' | b'e' | b'i' | b'o' | b'u');
    if a == b && b.is_ascii_alphabetic() && !vowel {
        w.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_forms_merge() {
        assert_eq!(stem("eating"), "eat");
        assert_eq!(stem("eaten"), "eat");
        assert_eq!(stem("ate"), "eat");
        assert_eq!(stem("eats"), "eat");
        assert_eq!(stem("eat"), "eat");
    }

    #[test]
    fn irregular_lookup_sees_normalized_input() {
        assert_eq!(stem("EATING!"), "eat");
        assert_eq!(stem("Ate."), "eat");
    }

    #[test]
    fn gerund_with_doubled_consonant() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("stopping"), "stop");
        assert_eq!(stem("stopped"), "stop");
    }

    #[test]
    fn past_tense_and_gerund() {
        assert_eq!(stem("played"), "play");
        assert_eq!(stem("playing"), "play");
        assert_eq!(stem("plays"), "play");
        assert_eq!(stem("wanted"), "want");
    }

    #[test]
    fn every_doubled_consonant_collapses() {
        assert_eq!(stem("falling"), "fal");
        assert_eq!(stem("calling"), "cal");
        assert_eq!(stem("spelled"), "spel");
        assert_eq!(stem("buzzed"), "buz");
        assert_eq!(stem("buzzing"), "buz");
        // Bare words have no suffix to strip.
        assert_eq!(stem("fall"), "fall");
    }

    #[test]
    fn doubled_vowels_kept() {
        assert_eq!(stem("seeing"), "see");
        assert_eq!(stem("freeing"), "free");
    }

    #[test]
    fn plural_rules() {
        assert_eq!(stem("flies"), "fly");
        assert_eq!(stem("studies"), "study");
        assert_eq!(stem("watches"), "watch");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("cats"), "cat");
    }

    #[test]
    fn short_words_unchanged() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("ads"), "ads");
        assert_eq!(stem("bed"), "bed");
        assert_eq!(stem("a"), "a");
    }

    #[test]
    fn length_guards() {
        // "ties" is too short for the -ies rule, so only -s goes.
        assert_eq!(stem("ties"), "tie");
        // "being" is too short for the -ing rule.
        assert_eq!(stem("being"), "being");
        // "feed" is too short for the -ed rule.
        assert_eq!(stem("feed"), "feed");
    }

    #[test]
    fn contractions_collapse_before_stemming() {
        assert_eq!(stem("they'd"), "they");
        assert_eq!(stem("it's"), "it");
        assert_eq!(stem("I'm"), "i");
    }

    #[test]
    fn repeated_passes_reach_fixed_point() {
        assert_eq!(stem("glasses"), stem("glass"));
        assert_eq!(stem("blessed"), stem("bless"));
    }

    #[test]
    fn irregular_words_outside_table_are_not_merged() {
        assert_eq!(stem("went"), "went");
    }

    #[test]
    fn empty_and_punctuation() {
        assert_eq!(stem(""), "");
        assert_eq!(stem("?!"), "");
    }

    #[test]
    fn non_latin_words_pass_through() {
        assert_eq!(stem("नमस्ते"), "नमस्ते");
    }

    #[test]
    fn parse_table() {
        let forms = IrregularForms::parse(
            "# irregular verbs\n\
             went = go\n\
             \n\
             Mice = mouse\n",
        )
        .expect("valid table");
        assert_eq!(forms.len(), 2);
        assert_eq!(forms.get("went"), Some("go"));
        assert_eq!(forms.get("mice"), Some("mouse"));

        let stemmer = Stemmer::new(forms);
        assert_eq!(stemmer.stem("Went"), "go");
        assert_eq!(stemmer.stem("eating"), "eat");
    }

    #[test]
    fn extend_default_table() {
        let mut forms = IrregularForms::default();
        let added = forms.extend_from_str("went = go\ngone = go").expect("valid lines");
        assert_eq!(added, 2);
        assert_eq!(forms.len(), DEFAULT_IRREGULAR.len() + 2);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = IrregularForms::parse("went = go\nmice mouse\n").unwrap_err();
        assert_eq!(
            err,
            StemmerError::MalformedLine {
                line: 2,
                content: "mice mouse".into()
            }
        );
        assert!(matches!(
            IrregularForms::parse("= go"),
            Err(StemmerError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn empty_entry_rejected() {
        assert!(matches!(
            IrregularForms::parse("!!! = go"),
            Err(StemmerError::EmptyEntry { .. })
        ));
    }

    #[test]
    fn unstable_root_rejected() {
        let err = IrregularForms::parse("ran = runs").unwrap_err();
        assert_eq!(
            err,
            StemmerError::UnstableRoot {
                root: "runs".into(),
                stems_to: "run".into()
            }
        );
    }

    #[test]
    fn chained_roots_rejected() {
        let err = IrregularForms::parse("went = go\ngo = walk").unwrap_err();
        assert!(matches!(err, StemmerError::ChainedRoot { .. }));

        let err = IrregularForms::parse("go = walk\nwent = go").unwrap_err();
        assert!(matches!(err, StemmerError::ChainedRoot { .. }));
    }

    #[test]
    fn default_table_is_valid() {
        let text: String = DEFAULT_IRREGULAR
            .iter()
            .map(|(form, root)| format!("{form} = {root}\n"))
            .collect();
        let forms = IrregularForms::parse(&text).expect("default table validates");
        assert_eq!(forms.len(), DEFAULT_IRREGULAR.len());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = IrregularForms::load("/nonexistent/irregular.txt").unwrap_err();
        assert!(matches!(err, StemmerError::Io(_)));
    }

    #[test]
    fn idempotent_on_samples() {
        for word in [
            "eating", "running", "played", "houses", "glasses", "studies", "buzzing",
            "they'd", "user123", "19", "ＨＥＬＬＯＳ",
        ] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "not idempotent for {word:?}");
        }
    }
}
