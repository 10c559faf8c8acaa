use std::sync::Arc;

use storage::curriculum::{Curriculum, CurriculumRepository};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::lessons::LessonLoopService;
use crate::placement_service::PlacementService;
use crate::progress_service::{ProgressService, ProgressSink};

/// Assembles app-facing services over one storage backend and the built-in curriculum.
#[derive(Clone)]
pub struct AppServices {
    curriculum: Arc<Curriculum>,
    progress: Arc<ProgressService>,
    lesson_loop: Arc<LessonLoopService>,
    catalog: Arc<CatalogService>,
    placement: Arc<PlacementService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or curriculum loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, seed)
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Curriculum` if the built-in curriculum is invalid.
    pub fn in_memory(clock: Clock, seed: Option<u64>) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock, seed)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::Curriculum` if the built-in curriculum is invalid.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let curriculum = Arc::new(Curriculum::builtin()?);
        let lessons: Arc<dyn CurriculumRepository> = curriculum.clone();

        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let sink: Arc<dyn ProgressSink> = progress.clone();

        let mut lesson_loop = LessonLoopService::new(Arc::clone(&lessons), sink);
        if let Some(seed) = seed {
            lesson_loop = lesson_loop.with_seed(seed);
        }
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&lessons),
            Arc::clone(&progress),
        ));
        let placement = Arc::new(PlacementService::new(lessons, Arc::clone(&progress)));

        Ok(Self {
            curriculum,
            progress,
            lesson_loop: Arc::new(lesson_loop),
            catalog,
            placement,
        })
    }

    #[must_use]
    pub fn curriculum(&self) -> Arc<Curriculum> {
        Arc::clone(&self.curriculum)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn lesson_loop(&self) -> Arc<LessonLoopService> {
        Arc::clone(&self.lesson_loop)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn placement(&self) -> Arc<PlacementService> {
        Arc::clone(&self.placement)
    }
}
