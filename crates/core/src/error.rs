use thiserror::Error;

use crate::model::{LessonError, LessonIdError, PhraseError, PlacementError};

/// Any validation failure raised while building domain values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    LessonId(#[from] LessonIdError),
    #[error(transparent)]
    Phrase(#[from] PhraseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
