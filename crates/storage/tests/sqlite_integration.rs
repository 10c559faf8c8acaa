use chrono::NaiveDate;
use lesson_core::model::{Level, LessonId, ProgressRecord, VocabPair, WordKey};
use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

fn lesson(s: u32, u: u32) -> LessonId {
    LessonId::new(s, u).unwrap()
}

fn sample_progress() -> ProgressRecord {
    let mut progress = ProgressRecord::new();
    progress.set_level(Level::new(2).unwrap());
    let vocab = [
        VocabPair::new("Hey", "Сайн уу"),
        VocabPair::new("Good morning", "Өглөөний мэнд"),
    ];
    progress.credit_lesson(lesson(2, 1), 10, vocab.iter());
    progress.credit_lesson(lesson(1, 3), 10, std::iter::empty());
    progress.credit_lesson(lesson(1, 1), 10, vocab.iter());
    progress.record_practice_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    progress.record_practice_on(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    progress
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_progress_and_lesson_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_progress().await.unwrap().is_none());

    let progress = sample_progress();
    repo.save_progress(&progress).await.expect("save");

    let fetched = repo.load_progress().await.expect("load").expect("row");
    assert_eq!(fetched, progress);
    assert_eq!(
        fetched.completed_lessons(),
        &[lesson(2, 1), lesson(1, 3), lesson(1, 1)]
    );
    assert_eq!(fetched.xp(), 30);
    assert_eq!(fetched.streak(), 2);
    assert_eq!(fetched.level().value(), 2);
    assert!(fetched.placement_completed());
    assert!(fetched.learned_words().contains(&WordKey::new("hey", "Сайн уу")));
}

#[tokio::test]
async fn sqlite_save_replaces_previous_state() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_progress(&sample_progress()).await.unwrap();

    let mut smaller = ProgressRecord::new();
    smaller.credit_lesson(lesson(3, 1), 10, std::iter::empty());
    repo.save_progress(&smaller).await.unwrap();

    let fetched = repo.load_progress().await.unwrap().unwrap();
    assert_eq!(fetched.completed_lessons(), &[lesson(3, 1)]);
    assert_eq!(fetched.learned_word_count(), 0);
    assert_eq!(fetched.last_practice(), None);
}

#[tokio::test]
async fn sqlite_clear_removes_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress_clear?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_progress(&sample_progress()).await.unwrap();
    repo.clear_progress().await.unwrap();
    assert!(repo.load_progress().await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn storage_sqlite_builds_progress_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_sqlite?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.progress.save_progress(&sample_progress()).await.unwrap();
    let fetched = storage.progress.load_progress().await.unwrap().unwrap();
    assert_eq!(fetched.completed_lessons().len(), 3);
}
