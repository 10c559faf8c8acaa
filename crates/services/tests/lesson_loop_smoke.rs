use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lesson_core::model::{
    LessonCredit, LessonId, StreakChange, StreakUpdate, VocabPair,
};
use lesson_core::sequencer::Step;
use services::{LessonLoopService, LessonSession, LessonSessionError, ProgressError, ProgressSink};
use storage::curriculum::{Curriculum, CurriculumRepository};
use storage::repository::StorageError;

#[derive(Default)]
struct RecordingSink {
    completions: Mutex<Vec<(LessonId, u32, usize)>>,
    practice_calls: AtomicUsize,
    fail_next_practice: AtomicBool,
}

impl RecordingSink {
    fn completions(&self) -> Vec<(LessonId, u32, usize)> {
        self.completions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn record_lesson_completed(
        &self,
        lesson_id: LessonId,
        xp_delta: u32,
        vocab: &[VocabPair],
    ) -> Result<LessonCredit, ProgressError> {
        self.completions
            .lock()
            .unwrap()
            .push((lesson_id, xp_delta, vocab.len()));
        Ok(LessonCredit {
            lesson_id,
            newly_completed: true,
            xp_awarded: xp_delta,
            total_xp: xp_delta,
            new_words: Vec::new(),
        })
    }

    async fn record_practice_today(&self) -> Result<StreakUpdate, ProgressError> {
        self.practice_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_practice.swap(false, Ordering::SeqCst) {
            return Err(ProgressError::Storage(StorageError::Connection(
                "offline".into(),
            )));
        }
        Ok(StreakUpdate {
            change: StreakChange::Started,
            streak: 1,
        })
    }
}

fn loop_service(sink: Arc<RecordingSink>) -> LessonLoopService {
    let curriculum: Arc<dyn CurriculumRepository> = Arc::new(Curriculum::builtin().unwrap());
    LessonLoopService::new(curriculum, sink).with_seed(42)
}

fn first_lesson() -> LessonId {
    LessonId::new(1, 1).unwrap()
}

fn finish_conversation(session: &mut LessonSession) {
    let seq = session.sequencer_mut();
    while seq.reveal_next_line().is_some() {}
    assert!(seq.all_lines_revealed());
    assert!(seq.advance().is_some());
}

fn answer_phrase(session: &mut LessonSession) {
    let seq = session.sequencer_mut();
    assert!(seq.advance().is_some(), "leave breakdown");
    for q in 0..2 {
        let correct = seq.current_phrase().unwrap().question(q).unwrap().correct();
        assert!(seq.select_option(correct));
        assert!(seq.advance().is_some(), "leave question {q}");
    }

    let bank = session.word_bank();
    let seq = session.sequencer_mut();
    let words = seq.current_phrase().unwrap().words().to_vec();
    assert_eq!(bank.len(), seq.current_phrase().unwrap().word_bank().len());
    for word in &words {
        assert!(seq.push_word(word), "word {word} available");
    }
    assert!(seq.submit_sentence().unwrap().correct);
    assert!(seq.advance().is_some(), "leave sentence builder");

    let board = session.vocab_board().expect("vocab step");
    let seq = session.sequencer_mut();
    let pairs = seq.current_phrase().unwrap().vocab_pairs().to_vec();
    assert_eq!(board.english.len(), pairs.len());
    for pair in &pairs {
        seq.confirm_pair(&pair.english, &pair.translation);
    }
}

#[tokio::test]
async fn first_lesson_completes_in_26_transitions_and_reports_once() {
    let sink = Arc::new(RecordingSink::default());
    let service = loop_service(Arc::clone(&sink));

    let mut session = service.start_lesson(&first_lesson()).expect("lesson 1-1");
    assert_eq!(session.sequencer().phrase_count(), 5);

    finish_conversation(&mut session);
    for _ in 0..5 {
        answer_phrase(&mut session);
    }

    assert_eq!(session.sequencer().step(), Step::Completion);
    assert_eq!(session.sequencer().transitions(), 26);
    assert!(sink.completions().is_empty(), "nothing reported before complete()");

    let outcome = session.complete().await.unwrap();
    assert_eq!(outcome.credit.xp_awarded, 10);
    assert_eq!(sink.completions(), vec![(first_lesson(), 10, 20)]);

    let again = session.complete().await.unwrap();
    assert_eq!(again, outcome);
    assert_eq!(sink.completions().len(), 1);
    assert_eq!(sink.practice_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn leaving_midway_reports_nothing_and_restarts_from_the_top() {
    let sink = Arc::new(RecordingSink::default());
    let service = loop_service(Arc::clone(&sink));

    let mut session = service.start_lesson(&first_lesson()).unwrap();
    session.sequencer_mut().skip_conversation();
    session.sequencer_mut().advance();
    for _ in 0..3 {
        answer_phrase(&mut session);
    }
    assert_eq!(session.sequencer().phrase_index(), 3);
    assert!(matches!(
        session.complete().await,
        Err(LessonSessionError::NotComplete)
    ));
    drop(session);

    assert!(sink.completions().is_empty());
    assert_eq!(sink.practice_calls.load(Ordering::SeqCst), 0);

    let reopened = service.start_lesson(&first_lesson()).unwrap();
    assert_eq!(reopened.sequencer().phrase_index(), 0);
    assert_eq!(reopened.sequencer().step(), Step::Conversation);
}

#[tokio::test]
async fn failed_practice_update_retries_without_double_credit() {
    let sink = Arc::new(RecordingSink::default());
    sink.fail_next_practice.store(true, Ordering::SeqCst);
    let service = loop_service(Arc::clone(&sink));

    let mut session = service
        .start_lesson(&LessonId::new(1, 6).unwrap())
        .unwrap();
    session.sequencer_mut().skip_conversation();
    session.sequencer_mut().advance();
    answer_phrase(&mut session);
    assert!(session.is_complete());

    assert!(matches!(
        session.complete().await,
        Err(LessonSessionError::Progress(_))
    ));
    assert!(session.outcome().is_none());

    let outcome = session.complete().await.unwrap();
    assert_eq!(outcome.streak.streak, 1);
    assert_eq!(sink.completions().len(), 1);
    assert_eq!(sink.practice_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_or_malformed_ids_open_nothing() {
    let service = loop_service(Arc::new(RecordingSink::default()));
    assert!(service.start_lesson(&LessonId::new(5, 6).unwrap()).is_none());
    assert!(service.start_lesson_str("9-9").is_none());
    assert!(service.start_lesson_str("lesson one").is_none());
    assert!(service.start_lesson_str("0-1").is_none());
    assert!(service.start_lesson_str("2-1").is_some());
}

#[tokio::test]
async fn seeded_sessions_shuffle_identically() {
    let sink = Arc::new(RecordingSink::default());
    let banks: Vec<Vec<String>> = (0..2)
        .map(|_| {
            let mut session = loop_service(Arc::clone(&sink))
                .start_lesson(&first_lesson())
                .unwrap();
            let seq = session.sequencer_mut();
            seq.skip_conversation();
            seq.advance();
            seq.advance();
            for q in 0..2 {
                let correct = seq.current_phrase().unwrap().question(q).unwrap().correct();
                seq.select_option(correct);
                seq.advance();
            }
            session.word_bank()
        })
        .collect();
    assert_eq!(banks[0], banks[1]);

    let mut sorted = banks[0].clone();
    sorted.sort();
    let mut expected = vec!["Hey", "Good", "morning", "How", "are", "you", "Hello", "Hi"];
    expected.sort_unstable();
    assert_eq!(sorted, expected);
}

#[tokio::test]
async fn encouragement_queue_fills_on_correct_answers() {
    let service = loop_service(Arc::new(RecordingSink::default()));
    let (mut session, messages) = service
        .start_lesson_with_encouragement(&first_lesson())
        .unwrap();
    let seq = session.sequencer_mut();
    seq.skip_conversation();
    seq.advance();
    seq.advance();
    let correct = seq.current_phrase().unwrap().question(0).unwrap().correct();
    seq.select_option((correct + 1) % 4);
    assert!(messages.drain().is_empty());
    seq.select_option(correct);
    assert_eq!(messages.drain().len(), 1);
}
