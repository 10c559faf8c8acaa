use thiserror::Error;

use crate::evaluator::normalize_english;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlacementError {
    #[error("level must be between {min} and {max}, got {0}", min = Level::MIN, max = Level::MAX)]
    InvalidLevel(u8),

    #[error("placement test has no questions")]
    NoQuestions,

    #[error("question {index}: correct option {correct} is out of range")]
    CorrectOutOfRange { index: usize, correct: usize },

    #[error("question {index}: word-bank answer is empty")]
    EmptyAnswer { index: usize },

    #[error("expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Learner proficiency from 1 (beginner) to 5 (advanced).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `PlacementError::InvalidLevel` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, PlacementError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PlacementError::InvalidLevel(value))
        }
    }

    #[must_use]
    pub fn beginner() -> Self {
        Self(Self::MIN)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Level for a placement score: two correct answers per level step.
    #[must_use]
    pub fn for_score(score: usize) -> Self {
        match score {
            0..=2 => Self(1),
            3..=4 => Self(2),
            5..=6 => Self(3),
            7..=8 => Self(4),
            _ => Self(5),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::beginner()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lv.{}", self.0)
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementKind {
    Choice { options: Vec<String>, correct: usize },
    WordBank { words: Vec<String>, answer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementQuestion {
    pub prompt: String,
    pub hint: Option<String>,
    pub kind: PlacementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementAnswer {
    Choice(usize),
    Words(Vec<String>),
}

impl PlacementQuestion {
    /// Word-bank answers compare the joined words case-insensitively.
    #[must_use]
    pub fn is_correct(&self, answer: &PlacementAnswer) -> bool {
        match (&self.kind, answer) {
            (PlacementKind::Choice { correct, .. }, PlacementAnswer::Choice(selected)) => {
                selected == correct
            }
            (PlacementKind::WordBank { answer: expected, .. }, PlacementAnswer::Words(words)) => {
                normalize_english(&words.join(" ")) == normalize_english(expected)
            }
            _ => false,
        }
    }
}

/// Fixed list of questions used to place a new learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTest {
    questions: Vec<PlacementQuestion>,
}

impl PlacementTest {
    /// # Errors
    ///
    /// Returns `PlacementError` if there are no questions or any question is malformed.
    pub fn new(questions: Vec<PlacementQuestion>) -> Result<Self, PlacementError> {
        if questions.is_empty() {
            return Err(PlacementError::NoQuestions);
        }
        for (index, question) in questions.iter().enumerate() {
            match &question.kind {
                PlacementKind::Choice { options, correct } if *correct >= options.len() => {
                    return Err(PlacementError::CorrectOutOfRange {
                        index,
                        correct: *correct,
                    });
                }
                PlacementKind::WordBank { answer, .. } if answer.trim().is_empty() => {
                    return Err(PlacementError::EmptyAnswer { index });
                }
                _ => {}
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[PlacementQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Count answers that match their question by position.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::AnswerCount` unless every question has an answer.
    pub fn score(&self, answers: &[PlacementAnswer]) -> Result<usize, PlacementError> {
        if answers.len() != self.questions.len() {
            return Err(PlacementError::AnswerCount {
                expected: self.questions.len(),
                actual: answers.len(),
            });
        }
        Ok(self
            .questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.is_correct(a))
            .count())
    }

    /// # Errors
    ///
    /// See [`PlacementTest::score`].
    pub fn level_for(&self, answers: &[PlacementAnswer]) -> Result<Level, PlacementError> {
        self.score(answers).map(Level::for_score)
    }
}
