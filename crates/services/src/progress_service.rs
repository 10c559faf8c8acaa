use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use lesson_core::model::{
    Achievement, Level, LessonCredit, LessonId, ProgressRecord, StreakUpdate, VocabPair,
};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::ProgressError;

/// Where finished lessons are reported.
///
/// Handed to each lesson session at construction; the session calls it once per
/// completed lesson.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Credit a finished lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the updated progress cannot be persisted.
    async fn record_lesson_completed(
        &self,
        lesson_id: LessonId,
        xp_delta: u32,
        vocab: &[VocabPair],
    ) -> Result<LessonCredit, ProgressError>;

    /// Mark today as a practice day and update the streak.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the updated progress cannot be persisted.
    async fn record_practice_today(&self) -> Result<StreakUpdate, ProgressError>;
}

/// Serializable view of the learner's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub level: u8,
    pub placement_completed: bool,
    pub xp: u32,
    pub streak: u32,
    pub last_practice: Option<NaiveDate>,
    pub completed_lessons: Vec<String>,
    pub learned_words: usize,
    pub achievements: Vec<&'static str>,
}

impl ProgressSummary {
    #[must_use]
    pub fn from_record(progress: &ProgressRecord) -> Self {
        Self {
            level: progress.level().value(),
            placement_completed: progress.placement_completed(),
            xp: progress.xp(),
            streak: progress.streak(),
            last_practice: progress.last_practice(),
            completed_lessons: progress
                .completed_lessons()
                .iter()
                .map(ToString::to_string)
                .collect(),
            learned_words: progress.learned_word_count(),
            achievements: Achievement::earned(progress)
                .into_iter()
                .map(Achievement::title)
                .collect(),
        }
    }
}

/// Storage-backed progress owner. Implements [`ProgressSink`].
///
/// Every update is a read-modify-write of the single progress record,
/// serialised through an async mutex.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            progress,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Current progress; a fresh record if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn load(&self) -> Result<ProgressRecord, ProgressError> {
        Ok(self.progress.load_progress().await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn summary(&self) -> Result<ProgressSummary, ProgressError> {
        let progress = self.load().await?;
        Ok(ProgressSummary::from_record(&progress))
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn achievements(&self) -> Result<Vec<Achievement>, ProgressError> {
        let progress = self.load().await?;
        Ok(Achievement::earned(&progress))
    }

    /// Store the level chosen by the placement test.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn complete_placement(&self, level: Level) -> Result<ProgressRecord, ProgressError> {
        self.update(|progress| {
            progress.set_level(level);
        })
        .await
        .map(|((), progress)| progress)
    }

    /// Forget everything about the learner.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn reset(&self) -> Result<(), ProgressError> {
        let _guard = self.write_lock.lock().await;
        self.progress.clear_progress().await?;
        info!("progress reset");
        Ok(())
    }

    async fn update<T>(
        &self,
        apply: impl FnOnce(&mut ProgressRecord) -> T + Send,
    ) -> Result<(T, ProgressRecord), ProgressError> {
        let _guard = self.write_lock.lock().await;
        let mut progress = self.load().await?;
        let out = apply(&mut progress);
        self.progress.save_progress(&progress).await?;
        Ok((out, progress))
    }
}

#[async_trait]
impl ProgressSink for ProgressService {
    async fn record_lesson_completed(
        &self,
        lesson_id: LessonId,
        xp_delta: u32,
        vocab: &[VocabPair],
    ) -> Result<LessonCredit, ProgressError> {
        let (credit, _) = self
            .update(|progress| progress.credit_lesson(lesson_id, xp_delta, vocab))
            .await?;
        if credit.newly_completed {
            info!(
                lesson = %lesson_id,
                xp = credit.xp_awarded,
                total_xp = credit.total_xp,
                new_words = credit.new_words.len(),
                "lesson completed"
            );
        } else {
            debug!(lesson = %lesson_id, "lesson replayed; no xp awarded");
        }
        Ok(credit)
    }

    async fn record_practice_today(&self) -> Result<StreakUpdate, ProgressError> {
        let today = self.clock.today();
        let (update, _) = self
            .update(|progress| progress.record_practice_on(today))
            .await?;
        debug!(%today, streak = update.streak, change = ?update.change, "practice recorded");
        Ok(update)
    }
}
