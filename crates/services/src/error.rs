//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::PlacementError;
use storage::curriculum::CurriculumError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the progress sink.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while finishing a lesson session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonSessionError {
    #[error("lesson is not complete yet")]
    NotComplete,
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `PlacementService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlacementServiceError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
}
