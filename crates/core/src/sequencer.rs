//! Lesson sequencer: walks a learner through every step of every phrase.
//!
//! Transitions happen only in response to explicit input. A call whose
//! precondition is not met (wrong step, unanswered question, incomplete
//! matching) is a no-op and reports `None`/`false`, never an error, so a UI may
//! fire input events freely.

use std::fmt;
use std::sync::Arc;

use crate::evaluator::{
    evaluate_multiple_choice, evaluate_sentence_builder, normalize_english, normalize_translation,
};
use crate::model::{ConversationLine, Lesson, LessonId, Phrase, VocabPair};

/// XP credited for completing a lesson.
pub const LESSON_XP: u32 = 10;

/// Successful transitions contributed by each phrase (breakdown through vocab match).
pub const TRANSITIONS_PER_PHRASE: usize = 5;

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Conversation,
    PhraseBreakdown,
    MultipleChoice1,
    MultipleChoice2,
    SentenceBuilder,
    VocabMatch,
    Completion,
}

impl Step {
    /// Zero-based question index for the multiple-choice steps.
    #[must_use]
    pub fn question_index(self) -> Option<usize> {
        match self {
            Step::MultipleChoice1 => Some(0),
            Step::MultipleChoice2 => Some(1),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Completion)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Conversation => "conversation",
            Step::PhraseBreakdown => "phrase breakdown",
            Step::MultipleChoice1 => "multiple choice 1",
            Step::MultipleChoice2 => "multiple choice 2",
            Step::SentenceBuilder => "sentence builder",
            Step::VocabMatch => "vocabulary match",
            Step::Completion => "completion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub phrase_index: usize,
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Position,
    pub to: Position,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of checking a built sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceFeedback {
    pub correct: bool,
    /// The canonical sentence, for display after a wrong attempt.
    pub expected: String,
}

/// Result of a vocabulary-match input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// One side is selected; waiting for the other.
    Pending,
    /// A selection was toggled off.
    Cleared,
    /// A new pair was confirmed. Carries the step transition when it was the last pair.
    Matched { transition: Option<Transition> },
    /// The two sides do not belong together. Selection is cleared.
    Mismatch,
    /// The pair was already confirmed and does not count again.
    AlreadyMatched,
    /// The sequencer is not on the vocabulary-match step.
    NotInVocabStep,
}

/// Emitted once when the lesson is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    pub lesson_id: LessonId,
    pub xp: u32,
    pub vocab: Vec<VocabPair>,
}

/// Snapshot of how far through the lesson the learner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerProgress {
    pub phrase_index: usize,
    pub phrase_count: usize,
    pub step: Step,
    pub completed_transitions: usize,
    pub total_transitions: usize,
}

impl SequencerProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total_transitions == 0 {
            return 1.0;
        }
        self.completed_transitions as f32 / self.total_transitions as f32
    }
}

//
// ─── OBSERVER ──────────────────────────────────────────────────────────────────
//

/// Optional hook for UI feedback (encouragement, sounds, analytics).
pub trait SequencerObserver: Send {
    fn on_transition(&mut self, _transition: &Transition) {}

    fn on_answer(&mut self, _step: Step, _correct: bool) {}
}

//
// ─── SEQUENCER ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
struct StepAnswers {
    selected_option: Option<usize>,
    built: Vec<String>,
    english: Option<String>,
    translation: Option<String>,
    matched: Vec<usize>,
    satisfied: bool,
}

/// State machine for a single attempt at a lesson.
///
/// One sequencer per opened lesson; discard it to abandon the attempt.
pub struct LessonSequencer {
    lesson: Arc<Lesson>,
    phrase_index: usize,
    step: Step,
    revealed_lines: usize,
    conversation_skipped: bool,
    answers: StepAnswers,
    transitions: usize,
    notified: bool,
    observer: Option<Box<dyn SequencerObserver>>,
}

impl LessonSequencer {
    /// Start at the conversation step of phrase 0.
    #[must_use]
    pub fn new(lesson: Arc<Lesson>) -> Self {
        Self {
            lesson,
            phrase_index: 0,
            step: Step::Conversation,
            revealed_lines: 0,
            conversation_skipped: false,
            answers: StepAnswers::default(),
            transitions: 0,
            notified: false,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SequencerObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ─── Queries ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson.id()
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.lesson.phrase_count()
    }

    #[must_use]
    pub fn current_phrase(&self) -> Option<&Phrase> {
        self.lesson.phrase(self.phrase_index)
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            phrase_index: self.phrase_index,
            step: self.step,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }

    #[must_use]
    pub fn is_step_satisfied(&self) -> bool {
        self.answers.satisfied
    }

    /// Number of successful transitions so far.
    #[must_use]
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.answers.selected_option
    }

    #[must_use]
    pub fn built_words(&self) -> &[String] {
        &self.answers.built
    }

    /// Vocabulary pairs confirmed on the current phrase.
    #[must_use]
    pub fn matched_pairs(&self) -> Vec<&VocabPair> {
        let Some(phrase) = self.current_phrase() else {
            return Vec::new();
        };
        self.answers
            .matched
            .iter()
            .filter_map(|i| phrase.vocab_pairs().get(*i))
            .collect()
    }

    #[must_use]
    pub fn selected_english(&self) -> Option<&str> {
        self.answers.english.as_deref()
    }

    #[must_use]
    pub fn selected_translation(&self) -> Option<&str> {
        self.answers.translation.as_deref()
    }

    /// `true` once the completion has been handed out.
    #[must_use]
    pub fn is_notified(&self) -> bool {
        self.notified
    }

    #[must_use]
    pub fn progress(&self) -> SequencerProgress {
        SequencerProgress {
            phrase_index: self.phrase_index,
            phrase_count: self.phrase_count(),
            step: self.step,
            completed_transitions: self.transitions,
            total_transitions: self.phrase_count() * TRANSITIONS_PER_PHRASE + 1,
        }
    }

    // ─── Conversation ─────────────────────────────────────────────────────────

    /// Conversation lines revealed so far.
    #[must_use]
    pub fn revealed_lines(&self) -> &[ConversationLine] {
        &self.lesson.conversation()[..self.revealed_lines]
    }

    #[must_use]
    pub fn all_lines_revealed(&self) -> bool {
        self.revealed_lines >= self.lesson.conversation().len()
    }

    /// Reveal the next scripted line. `None` when all are shown or outside the conversation.
    pub fn reveal_next_line(&mut self) -> Option<&ConversationLine> {
        if self.step != Step::Conversation || self.all_lines_revealed() {
            return None;
        }
        self.revealed_lines += 1;
        self.lesson.conversation().get(self.revealed_lines - 1)
    }

    /// Allow leaving the conversation before every line is revealed.
    pub fn skip_conversation(&mut self) {
        if self.step == Step::Conversation {
            self.conversation_skipped = true;
        }
    }

    // ─── Advancing ────────────────────────────────────────────────────────────

    /// Leave the current step if its precondition holds.
    ///
    /// Vocabulary matching advances on its own when the last pair is confirmed,
    /// so `advance` never leaves `VocabMatch` or `Completion`.
    pub fn advance(&mut self) -> Option<Transition> {
        let next = match self.step {
            Step::Conversation if self.all_lines_revealed() || self.conversation_skipped => {
                Step::PhraseBreakdown
            }
            Step::PhraseBreakdown => Step::MultipleChoice1,
            Step::MultipleChoice1 if self.answers.satisfied => Step::MultipleChoice2,
            Step::MultipleChoice2 if self.answers.satisfied => Step::SentenceBuilder,
            Step::SentenceBuilder if self.answers.satisfied => Step::VocabMatch,
            _ => return None,
        };
        Some(self.move_to(self.phrase_index, next))
    }

    fn move_to(&mut self, phrase_index: usize, step: Step) -> Transition {
        let transition = Transition {
            from: self.position(),
            to: Position { phrase_index, step },
        };
        self.phrase_index = phrase_index;
        self.step = step;
        self.answers = StepAnswers::default();
        self.transitions += 1;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_transition(&transition);
        }
        transition
    }

    fn report_answer(&mut self, correct: bool) {
        let step = self.step;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_answer(step, correct);
        }
    }

    // ─── Multiple choice ──────────────────────────────────────────────────────

    /// Select an option on the current question and report whether it is correct.
    ///
    /// Returns `false` outside the multiple-choice steps.
    pub fn select_option(&mut self, index: usize) -> bool {
        let Some(question_index) = self.step.question_index() else {
            return false;
        };
        let Some(question) = self
            .current_phrase()
            .and_then(|phrase| phrase.question(question_index))
        else {
            return false;
        };
        let correct = evaluate_multiple_choice(question, index);
        self.answers.selected_option = Some(index);
        self.answers.satisfied = correct;
        self.report_answer(correct);
        correct
    }

    /// Drop the current multiple-choice selection so the learner can retry.
    pub fn clear_selection(&mut self) {
        if self.step.question_index().is_some() {
            self.answers.selected_option = None;
            self.answers.satisfied = false;
        }
    }

    // ─── Sentence builder ─────────────────────────────────────────────────────

    /// Words still available in the bank (canonical words plus distractors,
    /// minus those already placed).
    #[must_use]
    pub fn available_words(&self) -> Vec<String> {
        let Some(phrase) = self.current_phrase() else {
            return Vec::new();
        };
        let mut bank = phrase.word_bank();
        for used in &self.answers.built {
            if let Some(pos) = bank.iter().position(|w| w == used) {
                bank.remove(pos);
            }
        }
        bank
    }

    /// Place a word from the bank at the end of the sentence.
    ///
    /// Returns `false` outside the sentence builder or if the bank has no such word left.
    pub fn push_word(&mut self, word: &str) -> bool {
        if self.step != Step::SentenceBuilder || self.answers.satisfied {
            return false;
        }
        if !self.available_words().iter().any(|w| w == word) {
            return false;
        }
        self.answers.built.push(word.to_owned());
        true
    }

    /// Take back the last placed word.
    pub fn pop_word(&mut self) -> Option<String> {
        if self.step != Step::SentenceBuilder || self.answers.satisfied {
            return None;
        }
        self.answers.built.pop()
    }

    /// Take back the word at `position`.
    pub fn remove_word_at(&mut self, position: usize) -> Option<String> {
        if self.step != Step::SentenceBuilder
            || self.answers.satisfied
            || position >= self.answers.built.len()
        {
            return None;
        }
        Some(self.answers.built.remove(position))
    }

    /// Check the built sentence.
    ///
    /// A wrong attempt clears the placed words. Returns `None` outside the
    /// sentence builder or when nothing has been placed yet.
    pub fn submit_sentence(&mut self) -> Option<SentenceFeedback> {
        if self.step != Step::SentenceBuilder || self.answers.built.is_empty() {
            return None;
        }
        let phrase = self.current_phrase()?;
        let correct = evaluate_sentence_builder(phrase, &self.answers.built);
        let expected = phrase.canonical_sentence();
        if correct {
            self.answers.satisfied = true;
        } else {
            self.answers.built.clear();
        }
        self.report_answer(correct);
        Some(SentenceFeedback { correct, expected })
    }

    // ─── Vocabulary match ─────────────────────────────────────────────────────

    /// Toggle an English-side selection; confirms once a translation is also selected.
    pub fn select_english(&mut self, word: &str) -> PairOutcome {
        if self.step != Step::VocabMatch {
            return PairOutcome::NotInVocabStep;
        }
        if self.answers.english.as_deref() == Some(word) {
            self.answers.english = None;
            return PairOutcome::Cleared;
        }
        self.answers.english = Some(word.to_owned());
        self.try_confirm_selection()
    }

    /// Toggle a translation-side selection; confirms once an English word is also selected.
    pub fn select_translation(&mut self, word: &str) -> PairOutcome {
        if self.step != Step::VocabMatch {
            return PairOutcome::NotInVocabStep;
        }
        if self.answers.translation.as_deref() == Some(word) {
            self.answers.translation = None;
            return PairOutcome::Cleared;
        }
        self.answers.translation = Some(word.to_owned());
        self.try_confirm_selection()
    }

    fn try_confirm_selection(&mut self) -> PairOutcome {
        let (Some(english), Some(translation)) =
            (self.answers.english.clone(), self.answers.translation.clone())
        else {
            return PairOutcome::Pending;
        };
        self.answers.english = None;
        self.answers.translation = None;
        self.confirm_pair(&english, &translation)
    }

    /// Confirm a pair directly.
    ///
    /// The step is left exactly once, on the match that brings the number of
    /// distinct confirmed pairs up to the phrase's pair count.
    pub fn confirm_pair(&mut self, english: &str, translation: &str) -> PairOutcome {
        if self.step != Step::VocabMatch {
            return PairOutcome::NotInVocabStep;
        }
        let Some(phrase) = self.current_phrase() else {
            return PairOutcome::NotInVocabStep;
        };

        let english = normalize_english(english);
        let translation = normalize_translation(translation);
        let candidates: Vec<usize> = phrase
            .vocab_pairs()
            .iter()
            .enumerate()
            .filter(|(_, pair)| {
                normalize_english(&pair.english) == english
                    && normalize_translation(&pair.translation) == translation
            })
            .map(|(i, _)| i)
            .collect();
        let pair_count = phrase.vocab_pairs().len();

        if candidates.is_empty() {
            self.report_answer(false);
            return PairOutcome::Mismatch;
        }
        let Some(index) = candidates
            .into_iter()
            .find(|i| !self.answers.matched.contains(i))
        else {
            return PairOutcome::AlreadyMatched;
        };

        self.answers.matched.push(index);
        self.report_answer(true);

        let transition = if self.answers.matched.len() == pair_count {
            Some(self.leave_vocab_match())
        } else {
            None
        };
        PairOutcome::Matched { transition }
    }

    fn leave_vocab_match(&mut self) -> Transition {
        let next_phrase = self.phrase_index + 1;
        if next_phrase >= self.phrase_count() {
            self.move_to(self.phrase_index, Step::Completion)
        } else {
            self.move_to(next_phrase, Step::PhraseBreakdown)
        }
    }

    // ─── Completion ───────────────────────────────────────────────────────────

    /// Hand out the lesson completion.
    ///
    /// Returns `Some` exactly once, and only after reaching `Completion`.
    pub fn take_completion(&mut self) -> Option<LessonCompletion> {
        if !self.is_complete() || self.notified {
            return None;
        }
        self.notified = true;
        Some(LessonCompletion {
            lesson_id: self.lesson.id(),
            xp: LESSON_XP,
            vocab: self.lesson.all_vocab_pairs().cloned().collect(),
        })
    }
}

impl fmt::Debug for LessonSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSequencer")
            .field("lesson_id", &self.lesson.id())
            .field("phrase_index", &self.phrase_index)
            .field("step", &self.step)
            .field("revealed_lines", &self.revealed_lines)
            .field("transitions", &self.transitions)
            .field("notified", &self.notified)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::phrase::tests::draft;
    use crate::model::{ConversationLine, Speaker};
    use std::sync::Mutex;

    fn lesson(phrases: usize) -> Arc<Lesson> {
        let phrases = (0..phrases)
            .map(|i| {
                let id = u32::try_from(i + 1).unwrap();
                draft(id, &["I'm", "good", "I'm", "not", "busy", "today"])
                    .validate()
                    .unwrap()
            })
            .collect();
        Arc::new(
            Lesson::new(
                LessonId::new(1, 1).unwrap(),
                vec![
                    ConversationLine::new(Speaker::A, "Hey! How are you?"),
                    ConversationLine::new(Speaker::B, "I'm good. I'm not busy today."),
                ],
                phrases,
            )
            .unwrap(),
        )
    }

    fn answer_current_phrase(seq: &mut LessonSequencer) {
        assert!(seq.advance().is_some(), "breakdown");
        let correct = seq.current_phrase().unwrap().question(0).unwrap().correct();
        assert!(seq.select_option(correct));
        assert!(seq.advance().is_some(), "mc1");
        let correct = seq.current_phrase().unwrap().question(1).unwrap().correct();
        assert!(seq.select_option(correct));
        assert!(seq.advance().is_some(), "mc2");
        let words: Vec<String> = seq.current_phrase().unwrap().words().to_vec();
        for word in &words {
            assert!(seq.push_word(word));
        }
        assert!(seq.submit_sentence().unwrap().correct);
        assert!(seq.advance().is_some(), "builder");
        let pairs: Vec<VocabPair> = seq.current_phrase().unwrap().vocab_pairs().to_vec();
        for pair in &pairs {
            assert!(matches!(
                seq.confirm_pair(&pair.english, &pair.translation),
                PairOutcome::Matched { .. }
            ));
        }
    }

    #[test]
    fn full_lesson_reaches_completion_after_five_transitions_per_phrase_plus_one() {
        for n in [1, 3, 5] {
            let mut seq = LessonSequencer::new(lesson(n));
            seq.skip_conversation();
            assert!(seq.advance().is_some());
            for _ in 0..n {
                answer_current_phrase(&mut seq);
            }
            assert_eq!(seq.step(), Step::Completion);
            assert_eq!(seq.transitions(), n * TRANSITIONS_PER_PHRASE + 1);
            assert!((seq.progress().fraction() - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn conversation_requires_all_lines_or_skip() {
        let mut seq = LessonSequencer::new(lesson(1));
        assert!(seq.advance().is_none());
        assert_eq!(seq.reveal_next_line().unwrap().speaker, Speaker::A);
        assert!(seq.advance().is_none());
        assert!(seq.reveal_next_line().is_some());
        assert!(seq.reveal_next_line().is_none());
        assert_eq!(seq.revealed_lines().len(), 2);
        let t = seq.advance().unwrap();
        assert_eq!(t.from.step, Step::Conversation);
        assert_eq!(t.to.step, Step::PhraseBreakdown);
    }

    #[test]
    fn wrong_multiple_choice_blocks_advance() {
        let mut seq = LessonSequencer::new(lesson(2));
        seq.skip_conversation();
        seq.advance();
        seq.advance();
        assert_eq!(seq.step(), Step::MultipleChoice1);

        let correct = seq.current_phrase().unwrap().question(0).unwrap().correct();
        let wrong = (correct + 1) % 4;
        assert!(!seq.select_option(wrong));
        assert!(seq.advance().is_none());
        assert_eq!(seq.step(), Step::MultipleChoice1);
        assert_eq!(seq.phrase_index(), 0);

        seq.clear_selection();
        assert_eq!(seq.selected_option(), None);
        assert!(seq.select_option(correct));
        assert_eq!(seq.advance().unwrap().to.step, Step::MultipleChoice2);
    }

    #[test]
    fn options_outside_multiple_choice_are_ignored() {
        let mut seq = LessonSequencer::new(lesson(1));
        assert!(!seq.select_option(0));
        assert_eq!(seq.selected_option(), None);
    }

    #[test]
    fn failed_sentence_clears_words_and_shows_expected() {
        let mut seq = LessonSequencer::new(lesson(1));
        seq.skip_conversation();
        seq.advance();
        seq.advance();
        seq.select_option(1);
        seq.advance();
        seq.select_option(0);
        seq.advance();
        assert_eq!(seq.step(), Step::SentenceBuilder);

        assert!(seq.submit_sentence().is_none());
        for word in ["I'm", "not", "busy", "today", "I'm", "good"] {
            assert!(seq.push_word(word));
        }
        assert!(!seq.push_word("I'm"), "bank has only two I'm");
        let feedback = seq.submit_sentence().unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.expected, "I'm good I'm not busy today");
        assert!(seq.built_words().is_empty());
        assert!(seq.advance().is_none());
        assert_eq!(seq.available_words().len(), 8);
    }

    #[test]
    fn word_editing_in_builder() {
        let mut seq = LessonSequencer::new(lesson(1));
        seq.skip_conversation();
        seq.advance();
        seq.advance();
        seq.select_option(1);
        seq.advance();
        seq.select_option(0);
        seq.advance();

        assert!(seq.push_word("am"));
        assert!(seq.push_word("I'm"));
        assert_eq!(seq.remove_word_at(0).as_deref(), Some("am"));
        assert_eq!(seq.pop_word().as_deref(), Some("I'm"));
        assert!(seq.remove_word_at(0).is_none());
        assert!(!seq.push_word("nonsense"));
    }

    #[test]
    fn vocab_match_transitions_once_on_last_distinct_pair() {
        let mut seq = LessonSequencer::new(lesson(2));
        seq.skip_conversation();
        seq.advance();
        seq.advance();
        seq.select_option(1);
        seq.advance();
        seq.select_option(0);
        seq.advance();
        for word in ["I'm", "good", "I'm", "not", "busy", "today"] {
            seq.push_word(word);
        }
        seq.submit_sentence();
        seq.advance();
        assert_eq!(seq.step(), Step::VocabMatch);
        let before = seq.transitions();

        assert_eq!(seq.select_translation("өнөөдөр"), PairOutcome::Pending);
        assert_eq!(
            seq.select_english("today"),
            PairOutcome::Matched { transition: None }
        );
        assert_eq!(seq.confirm_pair("today", "өнөөдөр"), PairOutcome::AlreadyMatched);
        assert_eq!(seq.confirm_pair("good", "завгүй"), PairOutcome::Mismatch);
        assert_eq!(seq.select_english("busy"), PairOutcome::Pending);
        assert_eq!(seq.select_english("busy"), PairOutcome::Cleared);
        assert_eq!(seq.confirm_pair("busy", "завгүй"), PairOutcome::Matched { transition: None });
        assert_eq!(seq.confirm_pair("I'm", "Би"), PairOutcome::Matched { transition: None });
        assert!(seq.advance().is_none());
        assert_eq!(seq.transitions(), before);

        let PairOutcome::Matched {
            transition: Some(t),
        } = seq.confirm_pair("GOOD", "сайн")
        else {
            panic!("fourth pair should transition");
        };
        assert_eq!(t.to.step, Step::PhraseBreakdown);
        assert_eq!(t.to.phrase_index, 1);
        assert_eq!(seq.transitions(), before + 1);
        assert!(seq.matched_pairs().is_empty());
    }

    #[test]
    fn completion_is_taken_once() {
        let mut seq = LessonSequencer::new(lesson(1));
        assert!(seq.take_completion().is_none());
        seq.skip_conversation();
        seq.advance();
        answer_current_phrase(&mut seq);
        assert!(seq.is_complete());
        assert!(seq.advance().is_none());

        let completion = seq.take_completion().unwrap();
        assert_eq!(completion.lesson_id.to_string(), "1-1");
        assert_eq!(completion.xp, LESSON_XP);
        assert_eq!(completion.vocab.len(), 4);
        assert!(seq.take_completion().is_none());
        assert!(seq.is_notified());
    }

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl SequencerObserver for Recorder {
        fn on_transition(&mut self, transition: &Transition) {
            self.events
                .lock()
                .unwrap()
                .push(format!("-> {}", transition.to.step));
        }

        fn on_answer(&mut self, step: Step, correct: bool) {
            self.events.lock().unwrap().push(format!("{step}: {correct}"));
        }
    }

    #[test]
    fn observer_sees_answers_and_transitions() {
        let recorder = Recorder::default();
        let events = Arc::clone(&recorder.events);
        let mut seq = LessonSequencer::new(lesson(1)).with_observer(Box::new(recorder));
        seq.skip_conversation();
        seq.advance();
        seq.advance();
        seq.select_option(3);

        let events = events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            &[
                "-> phrase breakdown".to_string(),
                "-> multiple choice 1".to_string(),
                "multiple choice 1: false".to_string(),
            ]
        );
    }
}
