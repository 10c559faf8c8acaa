use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use lesson_core::model::{LessonCredit, LessonId, StreakUpdate};
use lesson_core::sequencer::{LessonCompletion, LessonSequencer, Step};

use crate::error::LessonSessionError;
use crate::progress_service::ProgressSink;

/// What finishing a lesson changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonOutcome {
    pub credit: LessonCredit,
    pub streak: StreakUpdate,
}

/// Both vocabulary columns, each shuffled on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabBoard {
    pub english: Vec<String>,
    pub translations: Vec<String>,
}

#[derive(Debug, Clone)]
struct ShuffledBank {
    phrase_index: usize,
    tiles: Vec<String>,
}

#[derive(Debug, Clone)]
struct ShuffledBoard {
    phrase_index: usize,
    board: VocabBoard,
}

/// One learner attempt at one lesson.
///
/// Dropping the session abandons the attempt without persisting anything.
pub struct LessonSession {
    sequencer: LessonSequencer,
    sink: Arc<dyn ProgressSink>,
    rng: StdRng,
    bank: Option<ShuffledBank>,
    board: Option<ShuffledBoard>,
    pending: Option<LessonCompletion>,
    credit: Option<LessonCredit>,
    outcome: Option<LessonOutcome>,
}

impl LessonSession {
    #[must_use]
    pub fn new(sequencer: LessonSequencer, sink: Arc<dyn ProgressSink>, rng: StdRng) -> Self {
        Self {
            sequencer,
            sink,
            rng,
            bank: None,
            board: None,
            pending: None,
            credit: None,
            outcome: None,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.sequencer.lesson_id()
    }

    #[must_use]
    pub fn sequencer(&self) -> &LessonSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut LessonSequencer {
        &mut self.sequencer
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Outcome of `complete`, once it has succeeded.
    #[must_use]
    pub fn outcome(&self) -> Option<&LessonOutcome> {
        self.outcome.as_ref()
    }

    /// Word tiles still available on the sentence builder, in a shuffled order
    /// that stays stable for the phrase.
    pub fn word_bank(&mut self) -> Vec<String> {
        if self.sequencer.step() != Step::SentenceBuilder {
            return Vec::new();
        }
        let phrase_index = self.sequencer.phrase_index();
        let stale = self
            .bank
            .as_ref()
            .is_none_or(|bank| bank.phrase_index != phrase_index);
        if stale {
            let mut tiles = self
                .sequencer
                .current_phrase()
                .map(|phrase| phrase.word_bank())
                .unwrap_or_default();
            tiles.shuffle(&mut self.rng);
            self.bank = Some(ShuffledBank {
                phrase_index,
                tiles,
            });
        }

        let mut available = self
            .bank
            .as_ref()
            .map(|bank| bank.tiles.clone())
            .unwrap_or_default();
        for used in self.sequencer.built_words() {
            if let Some(pos) = available.iter().position(|tile| tile == used) {
                available.remove(pos);
            }
        }
        available
    }

    /// Shuffled vocabulary columns for the current phrase.
    pub fn vocab_board(&mut self) -> Option<VocabBoard> {
        if self.sequencer.step() != Step::VocabMatch {
            return None;
        }
        let phrase_index = self.sequencer.phrase_index();
        if let Some(cached) = &self.board {
            if cached.phrase_index == phrase_index {
                return Some(cached.board.clone());
            }
        }

        let pairs = self.sequencer.current_phrase()?.vocab_pairs();
        let mut english: Vec<String> = pairs.iter().map(|p| p.english.clone()).collect();
        let mut translations: Vec<String> = pairs.iter().map(|p| p.translation.clone()).collect();
        english.shuffle(&mut self.rng);
        translations.shuffle(&mut self.rng);

        let board = VocabBoard {
            english,
            translations,
        };
        self.board = Some(ShuffledBoard {
            phrase_index,
            board: board.clone(),
        });
        Some(board)
    }

    /// Report the finished lesson to the progress sink.
    ///
    /// The sink is told about the completion exactly once per session. Calling
    /// again returns the stored outcome; if a sink call failed, calling again
    /// retries only the part that did not go through.
    ///
    /// # Errors
    ///
    /// Returns `LessonSessionError::NotComplete` before the completion step, or
    /// `LessonSessionError::Progress` if the sink fails.
    pub async fn complete(&mut self) -> Result<LessonOutcome, LessonSessionError> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        if self.pending.is_none() {
            self.pending = self.sequencer.take_completion();
        }
        let Some(completion) = self.pending.as_ref() else {
            return Err(LessonSessionError::NotComplete);
        };

        let credit = if let Some(credit) = self.credit.clone() {
            credit
        } else {
            let credit = self
                .sink
                .record_lesson_completed(completion.lesson_id, completion.xp, &completion.vocab)
                .await
                .inspect_err(|err| {
                    warn!(lesson = %completion.lesson_id, error = %err, "recording completion failed");
                })?;
            self.credit = Some(credit.clone());
            credit
        };

        let streak = self.sink.record_practice_today().await.inspect_err(|err| {
            warn!(error = %err, "recording practice day failed");
        })?;

        debug!(lesson = %credit.lesson_id, streak = streak.streak, "lesson session finished");
        let outcome = LessonOutcome { credit, streak };
        self.pending = None;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}

impl std::fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonSession")
            .field("sequencer", &self.sequencer)
            .field("pending", &self.pending.is_some())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
