//! Pure correctness checks for each answerable lesson step.
//!
//! Normalization policy: English text is trimmed and case-folded everywhere
//! (sentence builder and vocabulary matching alike). Translation text is only
//! trimmed and compared case-sensitively. The same policy keys learned words.

use crate::model::{MultipleChoice, Phrase};

/// Trim and case-fold English text.
#[must_use]
pub fn normalize_english(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Trim translation text; case is significant.
#[must_use]
pub fn normalize_translation(text: &str) -> &str {
    text.trim()
}

/// `true` if `selected` is the question's correct option.
///
/// An index outside the options is simply incorrect.
#[must_use]
pub fn evaluate_multiple_choice(question: &MultipleChoice, selected: usize) -> bool {
    selected == question.correct()
}

/// `true` if the learner's words reproduce the phrase word-for-word, in order.
///
/// Comparison is positional, so repeated tokens must each sit in their own slot.
#[must_use]
pub fn evaluate_sentence_builder<S: AsRef<str>>(phrase: &Phrase, user_words: &[S]) -> bool {
    let expected = phrase.words();
    expected.len() == user_words.len()
        && expected
            .iter()
            .zip(user_words)
            .all(|(want, got)| normalize_english(want) == normalize_english(got.as_ref()))
}

/// Index of the phrase's vocabulary pair matching both sides, if any.
#[must_use]
pub fn find_vocab_pair(phrase: &Phrase, english: &str, translation: &str) -> Option<usize> {
    let english = normalize_english(english);
    let translation = normalize_translation(translation);
    phrase.vocab_pairs().iter().position(|pair| {
        normalize_english(&pair.english) == english
            && normalize_translation(&pair.translation) == translation
    })
}

/// `true` if `english` and `translation` belong to the same vocabulary pair.
#[must_use]
pub fn evaluate_vocab_pair(phrase: &Phrase, english: &str, translation: &str) -> bool {
    find_vocab_pair(phrase, english, translation).is_some()
}
