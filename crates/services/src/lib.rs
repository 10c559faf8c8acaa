#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod lessons;
pub mod placement_service;
pub mod progress_service;

pub use lesson_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, SectionView, UnitView};
pub use error::{AppServicesError, LessonSessionError, PlacementServiceError, ProgressError};
pub use lessons::{
    EncouragementFeed, Encouragements, LessonLoopService, LessonOutcome, LessonSession, VocabBoard,
};
pub use placement_service::{PlacementResult, PlacementService};
pub use progress_service::{ProgressService, ProgressSink, ProgressSummary};
