mod achievement;
mod ids;
mod lesson;
pub(crate) mod phrase;
mod placement;
mod progress;

pub use ids::{LessonId, LessonIdError, PhraseId};

pub use achievement::Achievement;
pub use lesson::{ConversationLine, Lesson, LessonError, Speaker};
pub use phrase::{
    BreakdownEntry, MultipleChoice, OPTIONS_PER_QUESTION, Phrase, PhraseDraft, PhraseError,
    QUESTIONS_PER_PHRASE, VocabPair,
};
pub use placement::{
    Level, PlacementAnswer, PlacementError, PlacementKind, PlacementQuestion, PlacementTest,
};
pub use progress::{LessonCredit, ProgressRecord, StreakChange, StreakUpdate, WordKey};
