mod encouragement;
mod session;
mod workflow;

// Public API of the lesson subsystem.
pub use crate::error::LessonSessionError;
pub use encouragement::{ENCOURAGEMENTS, EncouragementFeed, Encouragements, LESSON_COMPLETE};
pub use session::{LessonOutcome, LessonSession, VocabBoard};
pub use workflow::LessonLoopService;
