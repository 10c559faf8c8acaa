use thiserror::Error;

use crate::model::ids::LessonId;
use crate::model::phrase::{Phrase, VocabPair};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson {0} has no phrases")]
    NoPhrases(LessonId),

    #[error("lesson {0} has a blank conversation line")]
    BlankConversationLine(LessonId),
}

/// Which side of the scripted dialogue speaks a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationLine {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationLine {
    #[must_use]
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Ordered, non-empty sequence of phrases plus the dialogue that introduces them.
///
/// Lessons are static reference data and never change once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    conversation: Vec<ConversationLine>,
    phrases: Vec<Phrase>,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoPhrases` if `phrases` is empty and
    /// `LessonError::BlankConversationLine` if any line has no text.
    pub fn new(
        id: LessonId,
        conversation: Vec<ConversationLine>,
        phrases: Vec<Phrase>,
    ) -> Result<Self, LessonError> {
        if phrases.is_empty() {
            return Err(LessonError::NoPhrases(id));
        }
        if conversation.iter().any(|line| line.text.trim().is_empty()) {
            return Err(LessonError::BlankConversationLine(id));
        }
        Ok(Self {
            id,
            conversation,
            phrases,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn conversation(&self) -> &[ConversationLine] {
        &self.conversation
    }

    #[must_use]
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    #[must_use]
    pub fn phrase(&self, index: usize) -> Option<&Phrase> {
        self.phrases.get(index)
    }

    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Vocabulary pairs of every phrase, in lesson order.
    pub fn all_vocab_pairs(&self) -> impl Iterator<Item = &VocabPair> {
        self.phrases.iter().flat_map(|p| p.vocab_pairs().iter())
    }
}
