use chrono::NaiveDate;
use lesson_core::model::{Level, LessonId, ProgressRecord, WordKey};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn level_from_i64(v: i64) -> Result<Level, StorageError> {
    let raw = u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid level: {v}")))?;
    Level::new(raw).map_err(ser)
}

pub(crate) fn lesson_id_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LessonId, StorageError> {
    let section = i64_to_u32("section", row.try_get::<i64, _>("section").map_err(ser)?)?;
    let unit = i64_to_u32("unit", row.try_get::<i64, _>("unit").map_err(ser)?)?;
    LessonId::new(section, unit).map_err(ser)
}

pub(crate) fn word_key_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<WordKey, StorageError> {
    let english: String = row.try_get("english").map_err(ser)?;
    let translation: String = row.try_get("translation").map_err(ser)?;
    Ok(WordKey::new(&english, &translation))
}

/// Rebuild a `ProgressRecord` from the learner row plus its child tables.
pub(crate) fn map_progress_row(
    row: &sqlx::sqlite::SqliteRow,
    completed_lessons: Vec<LessonId>,
    learned_words: Vec<WordKey>,
) -> Result<ProgressRecord, StorageError> {
    let level = level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?;
    let placement_completed: bool = row.try_get("placement_completed").map_err(ser)?;
    let xp = i64_to_u32("xp", row.try_get::<i64, _>("xp").map_err(ser)?)?;
    let streak = i64_to_u32("streak", row.try_get::<i64, _>("streak").map_err(ser)?)?;
    let last_practice: Option<NaiveDate> = row.try_get("last_practice").map_err(ser)?;

    Ok(ProgressRecord::from_persisted(
        level,
        placement_completed,
        completed_lessons,
        xp,
        streak,
        last_practice,
        learned_words,
    ))
}
