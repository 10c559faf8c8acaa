use std::sync::Arc;

use lesson_core::model::{LessonId, ProgressRecord};
use storage::curriculum::CurriculumRepository;

use crate::error::ProgressError;
use crate::progress_service::ProgressService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitView {
    pub lesson_id: LessonId,
    pub title: String,
    pub completed: bool,
    /// Whether the curriculum has lesson content for this unit.
    pub has_content: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub id: u32,
    pub title: String,
    pub units: Vec<UnitView>,
}

impl SectionView {
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.completed).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.units.len()
    }
}

/// Lesson list for the home screen, merged with the learner's progress.
#[derive(Clone)]
pub struct CatalogService {
    curriculum: Arc<dyn CurriculumRepository>,
    progress: Arc<ProgressService>,
}

impl CatalogService {
    #[must_use]
    pub fn new(curriculum: Arc<dyn CurriculumRepository>, progress: Arc<ProgressService>) -> Self {
        Self {
            curriculum,
            progress,
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if progress cannot be loaded.
    pub async fn sections(&self) -> Result<Vec<SectionView>, ProgressError> {
        let progress = self.progress.load().await?;
        Ok(self.sections_for(&progress))
    }

    #[must_use]
    pub fn sections_for(&self, progress: &ProgressRecord) -> Vec<SectionView> {
        self.curriculum
            .sections()
            .iter()
            .map(|section| SectionView {
                id: section.id,
                title: section.title.clone(),
                units: section
                    .units
                    .iter()
                    .map(|unit| UnitView {
                        lesson_id: unit.lesson_id,
                        title: unit.title.clone(),
                        completed: progress.is_completed(unit.lesson_id),
                        has_content: self.curriculum.has_lesson(&unit.lesson_id),
                    })
                    .collect(),
            })
            .collect()
    }

    /// First playable lesson the learner has not completed yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if progress cannot be loaded.
    pub async fn next_lesson(&self) -> Result<Option<LessonId>, ProgressError> {
        let sections = self.sections().await?;
        Ok(sections
            .iter()
            .flat_map(|section| section.units.iter())
            .find(|unit| unit.has_content && !unit.completed)
            .map(|unit| unit.lesson_id))
    }
}
