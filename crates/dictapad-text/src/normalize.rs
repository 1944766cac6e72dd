//! Dictation fragment normalization.

use dictapad_core::Language;

use crate::rules::{
    add_space_after_punctuation, collapse_whitespace, contextual_capitalization,
    fix_english_pronouns, remove_space_before_punctuation, space_before_opening_marks,
};

/// Clean up a dictated `fragment` before it is inserted after `previous_text`.
///
/// Rules run in this order, each on the output of the one before:
/// 1. capitalization when `previous_text` ends a sentence
/// 2. `i` / `i'm` to `I` / `I'm` (English only)
/// 3. no whitespace before closing punctuation
/// 4. one space after punctuation followed by an ASCII letter or digit
/// 5. a space before `¿` / `¡` after an ASCII letter or digit (Spanish only)
/// 6. whitespace runs collapsed to one space
///
/// Capitalization has to come first: it trims the fragment, and the spacing
/// rules work on the trimmed text. `previous_text` is only read.
pub fn normalize(fragment: &str, previous_text: &str, language: Language) -> String {
    let mut text = contextual_capitalization(fragment, previous_text);

    if language == Language::En {
        text = fix_english_pronouns(&text);
    }

    text = remove_space_before_punctuation(&text);
    text = add_space_after_punctuation(&text);

    if language == Language::Es {
        text = space_before_opening_marks(&text);
    }

    let text = collapse_whitespace(&text);
    tracing::trace!(
        %language,
        fragment_len = fragment.len(),
        normalized_len = text.len(),
        "Fragment normalized"
    );
    text
}
