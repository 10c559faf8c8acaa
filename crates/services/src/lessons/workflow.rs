use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use lesson_core::model::LessonId;
use lesson_core::sequencer::{LessonSequencer, SequencerObserver};
use storage::curriculum::CurriculumRepository;

use super::encouragement::{EncouragementFeed, Encouragements};
use super::session::LessonSession;
use crate::progress_service::ProgressSink;

/// Opens lesson sessions against the curriculum and a progress sink.
///
/// Every session starts at the first phrase; there is no mid-lesson resume.
#[derive(Clone)]
pub struct LessonLoopService {
    curriculum: Arc<dyn CurriculumRepository>,
    sink: Arc<dyn ProgressSink>,
    seed: Option<u64>,
}

impl LessonLoopService {
    #[must_use]
    pub fn new(curriculum: Arc<dyn CurriculumRepository>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            curriculum,
            sink,
            seed: None,
        }
    }

    /// Seed shuffles and encouragement picks so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Open a lesson. Returns `None` if the curriculum has no content for `lesson_id`.
    #[must_use]
    pub fn start_lesson(&self, lesson_id: &LessonId) -> Option<LessonSession> {
        self.open(lesson_id, None)
    }

    /// Open a lesson with a sequencer observer attached.
    #[must_use]
    pub fn start_lesson_with_observer(
        &self,
        lesson_id: &LessonId,
        observer: Box<dyn SequencerObserver>,
    ) -> Option<LessonSession> {
        self.open(lesson_id, Some(observer))
    }

    /// Open a lesson and return the queue its encouragement messages land in.
    #[must_use]
    pub fn start_lesson_with_encouragement(
        &self,
        lesson_id: &LessonId,
    ) -> Option<(LessonSession, Encouragements)> {
        let messages = Encouragements::new();
        let feed = EncouragementFeed::new(self.rng(), messages.clone());
        let session = self.open(lesson_id, Some(Box::new(feed)))?;
        Some((session, messages))
    }

    /// Open a lesson by its `section-unit` id. Unparsable ids behave like unknown ones.
    #[must_use]
    pub fn start_lesson_str(&self, raw: &str) -> Option<LessonSession> {
        let Ok(lesson_id) = raw.parse::<LessonId>() else {
            debug!(raw, "ignoring malformed lesson id");
            return None;
        };
        self.start_lesson(&lesson_id)
    }

    fn open(
        &self,
        lesson_id: &LessonId,
        observer: Option<Box<dyn SequencerObserver>>,
    ) -> Option<LessonSession> {
        let Some(lesson) = self.curriculum.get_lesson(lesson_id) else {
            debug!(lesson = %lesson_id, "no content for lesson");
            return None;
        };
        info!(lesson = %lesson_id, phrases = lesson.phrase_count(), "starting lesson");

        let mut sequencer = LessonSequencer::new(lesson);
        if let Some(observer) = observer {
            sequencer = sequencer.with_observer(observer);
        }
        Some(LessonSession::new(
            sequencer,
            Arc::clone(&self.sink),
            self.rng(),
        ))
    }
}
