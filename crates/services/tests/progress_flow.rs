use lesson_core::model::{Achievement, LessonId, PlacementAnswer, PlacementKind, WordKey};
use lesson_core::time::fixed_clock;
use services::{AppServices, LessonSession};

fn lesson(s: u32, u: u32) -> LessonId {
    LessonId::new(s, u).unwrap()
}

fn play_to_completion(session: &mut LessonSession) {
    let seq = session.sequencer_mut();
    seq.skip_conversation();
    seq.advance().unwrap();
    while !seq.is_complete() {
        seq.advance().unwrap();
        for q in 0..2 {
            let correct = seq.current_phrase().unwrap().question(q).unwrap().correct();
            assert!(seq.select_option(correct));
            seq.advance().unwrap();
        }
        let words = seq.current_phrase().unwrap().words().to_vec();
        for word in &words {
            assert!(seq.push_word(word));
        }
        assert!(seq.submit_sentence().unwrap().correct);
        seq.advance().unwrap();
        let pairs = seq.current_phrase().unwrap().vocab_pairs().to_vec();
        for pair in &pairs {
            seq.confirm_pair(&pair.english, &pair.translation);
        }
    }
}

#[tokio::test]
async fn completing_a_lesson_updates_progress_and_catalog() {
    let app = AppServices::in_memory(fixed_clock(), Some(1)).unwrap();

    let mut session = app.lesson_loop().start_lesson(&lesson(1, 1)).unwrap();
    play_to_completion(&mut session);
    let outcome = session.complete().await.unwrap();
    assert!(outcome.credit.newly_completed);
    assert_eq!(outcome.credit.total_xp, 10);
    assert_eq!(outcome.streak.streak, 1);

    let progress = app.progress().load().await.unwrap();
    assert_eq!(progress.xp(), 10);
    assert_eq!(progress.completed_lessons(), &[lesson(1, 1)]);
    assert!(progress.learned_words().contains(&WordKey::new("busy", "завгүй")));
    assert_eq!(
        app.progress().achievements().await.unwrap(),
        vec![Achievement::FirstSteps]
    );

    let sections = app.catalog().sections().await.unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0].completed_count(), 1);
    assert_eq!(sections[0].total(), 6);
    assert!(sections[0].units[0].completed);
    assert!(sections[0].units[1].has_content);
    assert!(!sections[4].units[0].has_content);
    assert_eq!(app.catalog().next_lesson().await.unwrap(), Some(lesson(1, 2)));
}

#[tokio::test]
async fn replaying_a_lesson_awards_no_xp() {
    let app = AppServices::in_memory(fixed_clock(), Some(2)).unwrap();

    for _ in 0..2 {
        let mut session = app.lesson_loop().start_lesson(&lesson(1, 5)).unwrap();
        play_to_completion(&mut session);
        session.complete().await.unwrap();
    }

    let progress = app.progress().load().await.unwrap();
    assert_eq!(progress.xp(), 10);
    assert_eq!(progress.completed_lessons().len(), 1);
    assert_eq!(progress.streak(), 1);
}

#[tokio::test]
async fn placement_sets_level() {
    let app = AppServices::in_memory(fixed_clock(), None).unwrap();
    let placement = app.placement();

    let answers: Vec<PlacementAnswer> = placement
        .test()
        .questions()
        .iter()
        .map(|q| match &q.kind {
            PlacementKind::Choice { correct, .. } => PlacementAnswer::Choice(*correct),
            PlacementKind::WordBank { answer, .. } => PlacementAnswer::Words(
                answer.split_whitespace().map(str::to_owned).collect(),
            ),
        })
        .collect();

    let result = placement.submit(&answers).await.unwrap();
    assert_eq!(result.score, 10);
    assert_eq!(result.level.value(), 5);

    let progress = app.progress().load().await.unwrap();
    assert!(progress.placement_completed());
    assert_eq!(progress.level().value(), 5);

    assert!(placement.submit(&answers[..3]).await.is_err());
}

#[tokio::test]
async fn sqlite_backed_progress_survives_restart() {
    let url = "sqlite:file:memdb_services_restart?mode=memory&cache=shared";
    let first = AppServices::new_sqlite(url, fixed_clock(), Some(3))
        .await
        .unwrap();
    let mut session = first.lesson_loop().start_lesson(&lesson(2, 3)).unwrap();
    play_to_completion(&mut session);
    session.complete().await.unwrap();

    let second = AppServices::new_sqlite(url, fixed_clock(), Some(3))
        .await
        .unwrap();
    let summary = second.progress().summary().await.unwrap();
    assert_eq!(summary.xp, 10);
    assert_eq!(summary.completed_lessons, vec!["2-3".to_string()]);

    second.progress().reset().await.unwrap();
    assert_eq!(first.progress().load().await.unwrap().xp(), 0);
}
