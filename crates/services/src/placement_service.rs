use std::sync::Arc;

use tracing::info;

use lesson_core::model::{Level, PlacementAnswer, PlacementTest};
use storage::curriculum::CurriculumRepository;

use crate::error::PlacementServiceError;
use crate::progress_service::ProgressService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    pub score: usize,
    pub total: usize,
    pub level: Level,
}

/// Scores the placement test and stores the resulting level.
#[derive(Clone)]
pub struct PlacementService {
    curriculum: Arc<dyn CurriculumRepository>,
    progress: Arc<ProgressService>,
}

impl PlacementService {
    #[must_use]
    pub fn new(curriculum: Arc<dyn CurriculumRepository>, progress: Arc<ProgressService>) -> Self {
        Self {
            curriculum,
            progress,
        }
    }

    #[must_use]
    pub fn test(&self) -> &PlacementTest {
        self.curriculum.placement()
    }

    /// # Errors
    ///
    /// Returns `PlacementServiceError::Placement` unless every question is
    /// answered, or `PlacementServiceError::Progress` if the level cannot be saved.
    pub async fn submit(
        &self,
        answers: &[PlacementAnswer],
    ) -> Result<PlacementResult, PlacementServiceError> {
        let test = self.test();
        let score = test.score(answers)?;
        let level = Level::for_score(score);
        self.progress.complete_placement(level).await?;
        info!(score, total = test.len(), %level, "placement completed");
        Ok(PlacementResult {
            score,
            total: test.len(),
            level,
        })
    }
}
