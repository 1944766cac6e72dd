//! Individual normalization rules.
//!
//! Each rule is a total `&str -> String` transform. A rule whose pattern does
//! not occur returns its input unchanged. [`crate::normalize`] composes them
//! in a fixed order; the order matters, so the rules are kept separate rather
//! than fused into one pass.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Characters after which the next fragment starts a new sentence.
pub const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("Invalid token regex"));

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;:!?)\]}])").expect("Invalid punctuation regex"));

static MISSING_SPACE_AFTER_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([.,;:!?])([a-zA-Z0-9])").expect("Invalid punctuation regex")
});

static MISSING_SPACE_BEFORE_OPENING_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z0-9])([¿¡])").expect("Invalid opening mark regex"));

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("Invalid whitespace regex"));

// =============================================================================
// Capitalization
// =============================================================================

/// Whether text appended after `previous` starts a new sentence.
///
/// True for an empty or whitespace-only document, or when the last
/// non-whitespace character is a sentence terminator.
pub fn capitalize_next(previous: &str) -> bool {
    match previous.trim_end().chars().next_back() {
        None => true,
        Some(last) => SENTENCE_TERMINATORS.contains(&last),
    }
}

/// Uppercase the first character. Handles multi-char uppercase forms (`ß`).
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rule 1: capitalize a fragment that starts a sentence.
///
/// Leading whitespace is trimmed before capitalizing. A single space is put
/// back when the fragment began with a space and the document is non-empty
/// and does not end in a line break, so words do not run together.
pub fn contextual_capitalization(fragment: &str, previous: &str) -> String {
    if !capitalize_next(previous) {
        return fragment.to_string();
    }

    let capitalized = capitalize_first(fragment.trim_start());
    if !previous.is_empty() && !previous.ends_with('\n') && fragment.starts_with(' ') {
        format!(" {capitalized}")
    } else {
        capitalized
    }
}

// =============================================================================
// Language-specific rules
// =============================================================================

/// Rule 2 (English): standalone `i` and `i'm` become `I` and `I'm`.
///
/// Only whole whitespace-delimited tokens are touched, so `it`, `hi` or `i,`
/// stay as they are.
pub fn fix_english_pronouns(text: &str) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures| match &caps[0] {
            "i" => "I".to_string(),
            "i'm" => "I'm".to_string(),
            other => other.to_string(),
        })
        .into_owned()
}

/// Rule 5 (Spanish): `hola¿` becomes `hola ¿`. Only an ASCII letter or digit
/// before the mark counts, so `sí¡` is left alone.
pub fn space_before_opening_marks(text: &str) -> String {
    MISSING_SPACE_BEFORE_OPENING_MARK_RE
        .replace_all(text, "$1 $2")
        .into_owned()
}

// =============================================================================
// Spacing rules
// =============================================================================

/// Rule 3: `word .` becomes `word.`, also for `, ; : ! ? ) ] }`.
pub fn remove_space_before_punctuation(text: &str) -> String {
    SPACE_BEFORE_PUNCT_RE.replace_all(text, "$1").into_owned()
}

/// Rule 4: `word,word` becomes `word, word`, also for `. ; : ! ?`. Only an
/// ASCII letter or digit after the mark counts.
pub fn add_space_after_punctuation(text: &str) -> String {
    MISSING_SPACE_AFTER_PUNCT_RE
        .replace_all(text, "$1 $2")
        .into_owned()
}

/// Rule 6: any run of two or more whitespace characters becomes one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text, " ").into_owned()
}
