use thiserror::Error;

use crate::model::ids::PhraseId;

/// Every phrase carries exactly this many multiple-choice questions.
pub const QUESTIONS_PER_PHRASE: usize = 2;

/// Every multiple-choice question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhraseError {
    #[error("phrase text cannot be empty")]
    EmptyText,

    #[error("phrase translation cannot be empty")]
    EmptyTranslation,

    #[error("phrase must have at least one word")]
    NoWords,

    #[error("phrase words cannot be blank")]
    BlankWord,

    #[error("phrase must have exactly {QUESTIONS_PER_PHRASE} questions, got {count}")]
    WrongQuestionCount { count: usize },

    #[error("question must have exactly {OPTIONS_PER_QUESTION} options, got {count}")]
    WrongOptionCount { count: usize },

    #[error("correct option {correct} is out of range for {options} options")]
    CorrectOutOfRange { correct: usize, options: usize },

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("phrase must have at least one vocabulary pair")]
    NoVocabPairs,

    #[error("vocabulary pair sides cannot be blank")]
    BlankVocab,
}

//
// ─── PARTS ─────────────────────────────────────────────────────────────────────
//

/// One `word → meaning` gloss shown on the breakdown step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    pub word: String,
    pub meaning: String,
}

impl BreakdownEntry {
    #[must_use]
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
        }
    }
}

/// English word or expression paired with its translation for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabPair {
    pub english: String,
    pub translation: String,
}

impl VocabPair {
    #[must_use]
    pub fn new(english: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            translation: translation.into(),
        }
    }
}

/// A four-option question with one correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoice {
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl MultipleChoice {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError` if the prompt is blank, the option count is not
    /// `OPTIONS_PER_QUESTION`, or `correct` does not index an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, PhraseError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(PhraseError::EmptyPrompt);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(PhraseError::WrongOptionCount {
                count: options.len(),
            });
        }
        if correct >= options.len() {
            return Err(PhraseError::CorrectOutOfRange {
                correct,
                options: options.len(),
            });
        }
        Ok(Self {
            prompt: prompt.trim().to_owned(),
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }
}

//
// ─── PHRASE ────────────────────────────────────────────────────────────────────
//

/// Unvalidated phrase fields, as read from curriculum data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseDraft {
    pub id: PhraseId,
    pub text: String,
    pub translation: String,
    pub breakdown: Vec<BreakdownEntry>,
    pub words: Vec<String>,
    pub extra_words: Vec<String>,
    pub vocab_pairs: Vec<VocabPair>,
    pub questions: Vec<MultipleChoice>,
}

impl PhraseDraft {
    /// Validate the draft into an immutable `Phrase`.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError` when any phrase invariant does not hold.
    pub fn validate(self) -> Result<Phrase, PhraseError> {
        if self.text.trim().is_empty() {
            return Err(PhraseError::EmptyText);
        }
        if self.translation.trim().is_empty() {
            return Err(PhraseError::EmptyTranslation);
        }
        if self.words.is_empty() {
            return Err(PhraseError::NoWords);
        }
        if self.words.iter().any(|w| w.trim().is_empty()) {
            return Err(PhraseError::BlankWord);
        }
        if self.questions.len() != QUESTIONS_PER_PHRASE {
            return Err(PhraseError::WrongQuestionCount {
                count: self.questions.len(),
            });
        }
        if self.vocab_pairs.is_empty() {
            return Err(PhraseError::NoVocabPairs);
        }
        if self
            .vocab_pairs
            .iter()
            .any(|p| p.english.trim().is_empty() || p.translation.trim().is_empty())
        {
            return Err(PhraseError::BlankVocab);
        }

        Ok(Phrase {
            id: self.id,
            text: self.text.trim().to_owned(),
            translation: self.translation.trim().to_owned(),
            breakdown: self.breakdown,
            words: self.words,
            extra_words: self
                .extra_words
                .into_iter()
                .filter(|w| !w.trim().is_empty())
                .collect(),
            vocab_pairs: self.vocab_pairs,
            questions: self.questions,
        })
    }
}

/// One sentence-level teaching unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    id: PhraseId,
    text: String,
    translation: String,
    breakdown: Vec<BreakdownEntry>,
    words: Vec<String>,
    extra_words: Vec<String>,
    vocab_pairs: Vec<VocabPair>,
    questions: Vec<MultipleChoice>,
}

impl Phrase {
    #[must_use]
    pub fn id(&self) -> PhraseId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn breakdown(&self) -> &[BreakdownEntry] {
        &self.breakdown
    }

    /// Canonical word order of the sentence.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn extra_words(&self) -> &[String] {
        &self.extra_words
    }

    #[must_use]
    pub fn vocab_pairs(&self) -> &[VocabPair] {
        &self.vocab_pairs
    }

    #[must_use]
    pub fn questions(&self) -> &[MultipleChoice] {
        &self.questions
    }

    /// Question by zero-based position; `None` past the second question.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&MultipleChoice> {
        self.questions.get(index)
    }

    /// Canonical words followed by the distractors, unshuffled.
    #[must_use]
    pub fn word_bank(&self) -> Vec<String> {
        self.words
            .iter()
            .chain(self.extra_words.iter())
            .cloned()
            .collect()
    }

    /// The correct sentence as shown after a failed sentence-builder attempt.
    #[must_use]
    pub fn canonical_sentence(&self) -> String {
        self.words.join(" ")
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
