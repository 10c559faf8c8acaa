use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies a lesson by its catalog position (`section-unit`).
///
/// Each unit of a section is exactly one lesson, so the pair is the whole key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonId {
    section: u32,
    unit: u32,
}

impl LessonId {
    /// Creates a new `LessonId`.
    ///
    /// # Errors
    ///
    /// Returns `LessonIdError::ZeroPart` if either part is zero.
    pub fn new(section: u32, unit: u32) -> Result<Self, LessonIdError> {
        if section == 0 || unit == 0 {
            return Err(LessonIdError::ZeroPart);
        }
        Ok(Self { section, unit })
    }

    #[must_use]
    pub fn section(&self) -> u32 {
        self.section
    }

    #[must_use]
    pub fn unit(&self) -> u32 {
        self.unit
    }
}

/// Ordinal identifier of a phrase within its lesson.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhraseId(u32);

impl PhraseId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({}-{})", self.section, self.unit)
    }
}

impl fmt::Debug for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhraseId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section, self.unit)
    }
}

impl fmt::Display for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for building or parsing a `LessonId`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonIdError {
    #[error("lesson id parts must be >= 1")]
    ZeroPart,

    #[error("failed to parse lesson id from {raw:?} (expected `section-unit`)")]
    Malformed { raw: String },
}

impl FromStr for LessonId {
    type Err = LessonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LessonIdError::Malformed { raw: s.to_string() };
        let (section, unit) = s.trim().split_once('-').ok_or_else(malformed)?;
        let section = section.parse::<u32>().map_err(|_| malformed())?;
        let unit = unit.parse::<u32>().map_err(|_| malformed())?;
        LessonId::new(section, unit)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
