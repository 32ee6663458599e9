use std::borrow::Cow;

use memchr::memchr;
use unicode_normalization::char::decompose_canonical;
use unicode_normalization::{is_nfkc, UnicodeNormalization};

/// First and last code points of the Devanagari block.
///
/// Devanagari vowel signs and viramas are not `Alphabetic`, so the block is
/// whitelisted wholesale to keep words in that script intact.
pub const DEVANAGARI: core::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// English contraction suffixes collapsed onto their base word.
const CONTRACTION_SUFFIXES: [&[u8]; 7] = [b"d", b"ll", b"ve", b"re", b"m", b"s", b"t"];

#[inline(always)]
pub(crate) fn is_devanagari(c: char) -> bool {
    DEVANAGARI.contains(&c)
}

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c == '\'' || c.is_alphanumeric() || is_devanagari(c)
}

#[inline(always)]
const fn unify_quote(c: char) -> char {
    match c {
        '\u{2019}' | '\u{2018}' => '\'',
        _ => c,
    }
}

/// Configuration options for word normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// When enabled, `[a-z]+'(d|ll|ve|re|m|s|t)` collapses to its base.
    /// For example, "they'd" becomes "they" and "can't" becomes "can".
    ///
    /// The collapse is lossy: "it's" becomes "it" whether it stood for
    /// "it is" or "it has".
    pub collapse_contractions: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            collapse_contractions: true,
        }
    }
}

impl NormalizerConfig {
    /// Keeps contractions as written ("i'm" stays "i'm").
    pub const fn preserving_contractions() -> Self {
        Self {
            collapse_contractions: false,
        }
    }
}

/// Per-word Unicode, case and punctuation canonicalizer.
///
/// Performs the following operations, in order:
/// - Unicode NFKC, so compatibility glyphs and combining sequences collapse
/// - Curly single quotes (U+2018, U+2019) become ASCII `'`
/// - Full casefold (`ß` folds to `ss`, final sigma to `σ`)
/// - Strips leading/trailing characters that are neither alphanumeric,
///   Devanagari, nor `'`; interior characters are untouched
/// - Optionally collapses English contractions onto their base word
///
/// Input that normalizes to nothing (pure punctuation) yields `""`.
///
/// # Performance
///
/// Pure-ASCII input skips Unicode normalization entirely; ASCII is already
/// NFKC-stable and contains no curly quotes.
///
/// # Examples
///
/// ```
/// use wordtally_core::analyzer::normalizer::{NormalizerConfig, WordNormalizer};
///
/// let normalizer = WordNormalizer::default();
/// assert_eq!(normalizer.normalize("«They’d»"), "they");
///
/// let keeper = WordNormalizer::new(NormalizerConfig::preserving_contractions());
/// assert_eq!(keeper.normalize("They’d"), "they'd");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordNormalizer {
    config: NormalizerConfig,
}

impl WordNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline(always)]
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes a word into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        if input.is_empty() {
            return;
        }

        if input.is_ascii() {
            out.reserve(input.len());
            out.extend(input.bytes().map(|b| char::from(b.to_ascii_lowercase())));
        } else {
            out.reserve(input.len() + input.len() / 8);
            for ch in input.nfkc() {
                push_folded(unify_quote(ch), out);
            }

            // Folding can occasionally produce a sequence that NFKC would
            // rewrite again (e.g. a folded letter followed by a combining mark).
            if !out.is_ascii() && !is_nfkc(out) {
                let renormalized: String = out.nfkc().collect();
                out.clear();
                for ch in renormalized.chars() {
                    push_folded(ch, out);
                }
            }
        }

        trim_non_word(out);

        if self.config.collapse_contractions {
            if let Some(base_len) = contraction_base(out) {
                out.truncate(base_len);
            }
        }
    }

    /// Normalizes a word and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Normalizes a single word with the default configuration.
///
/// Also suitable for user-supplied search or keyword input.
///
/// ```
/// use wordtally_core::analyzer::normalize;
///
/// assert_eq!(normalize("Can’t!"), "can");
/// assert_eq!(normalize("STRAßE"), "strasse");
/// assert_eq!(normalize("..."), "");
/// ```
pub fn normalize(token: &str) -> String {
    WordNormalizer::default().normalize(token)
}

/// Applies the text-level part of normalization (NFKC and quote unification)
/// to a whole message before token extraction.
///
/// ASCII input is returned borrowed.
pub fn canonicalize_text(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.nfkc().map(unify_quote).collect())
    }
}

/// Pushes the full case folding of `c`.
///
/// `char::to_lowercase` covers the simple mappings; the table below adds the
/// full foldings where casefold and lowercase disagree.
#[inline]
fn push_folded(c: char, out: &mut String) {
    // Cherokee folds to its uppercase letters.
    if is_cherokee(c) {
        out.extend(c.to_uppercase());
        return;
    }

    for lowered in c.to_lowercase() {
        match lowered {
            'ß' => out.push_str("ss"),
            'ς' => out.push('σ'),
            '\u{0345}' => out.push('ι'),
            'ẛ' => out.push('ṡ'),
            // Greek letters with ypogegrammeni fold to letter + iota.
            '\u{1F80}'..='\u{1FFF}' if has_ypogegrammeni(lowered) => {
                decompose_canonical(lowered, |d| {
                    out.push(if d == '\u{0345}' { 'ι' } else { d });
                });
            }
            _ => out.push(lowered),
        }
    }
}

#[inline]
fn is_cherokee(c: char) -> bool {
    matches!(c, '\u{13A0}'..='\u{13F5}' | '\u{13F8}'..='\u{13FD}' | '\u{AB70}'..='\u{ABBF}')
}

fn has_ypogegrammeni(c: char) -> bool {
    let mut found = false;
    decompose_canonical(c, |d| found |= d == '\u{0345}');
    found
}

/// Removes leading and trailing non-word characters in place.
fn trim_non_word(s: &mut String) {
    let end = s
        .char_indices()
        .rev()
        .find(|&(_, c)| is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    s.truncate(end);

    let start = s
        .char_indices()
        .find(|&(_, c)| is_word_char(c))
        .map_or(s.len(), |(i, _)| i);
    s.drain(..start);
}

/// Returns the byte length of the base word if `word` is a contraction.
fn contraction_base(word: &str) -> Option<usize> {
    let bytes = word.as_bytes();
    let apos = memchr(b'\'', bytes)?;

    if apos == 0 || !bytes[..apos].iter().all(u8::is_ascii_lowercase) {
        return None;
    }

    CONTRACTION_SUFFIXES
        .contains(&&bytes[apos + 1..])
        .then_some(apos)
}
