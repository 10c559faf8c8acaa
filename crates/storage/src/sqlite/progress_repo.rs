use async_trait::async_trait;
use chrono::Utc;
use lesson_core::model::ProgressRecord;
use tracing::debug;

use crate::repository::{ProgressRepository, StorageError};

use super::SqliteRepository;
use super::mapping::{lesson_id_from_row, map_progress_row, word_key_from_row};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT level, placement_completed, xp, streak, last_practice
            FROM progress
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lesson_rows = sqlx::query(
            r"
            SELECT section, unit
            FROM completed_lessons
            ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let completed = lesson_rows
            .iter()
            .map(lesson_id_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let word_rows = sqlx::query("SELECT english, translation FROM learned_words")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        let words = word_rows
            .iter()
            .map(word_key_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        map_progress_row(&row, completed, words).map(Some)
    }

    async fn save_progress(&self, progress: &ProgressRecord) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO progress (
                id,
                level,
                placement_completed,
                xp,
                streak,
                last_practice,
                updated_at
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                level = excluded.level,
                placement_completed = excluded.placement_completed,
                xp = excluded.xp,
                streak = excluded.streak,
                last_practice = excluded.last_practice,
                updated_at = excluded.updated_at
            ",
        )
        .bind(i64::from(progress.level().value()))
        .bind(progress.placement_completed())
        .bind(i64::from(progress.xp()))
        .bind(i64::from(progress.streak()))
        .bind(progress.last_practice())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM completed_lessons")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        for (position, lesson_id) in progress.completed_lessons().iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                INSERT INTO completed_lessons (position, section, unit)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(position)
            .bind(i64::from(lesson_id.section()))
            .bind(i64::from(lesson_id.unit()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        sqlx::query("DELETE FROM learned_words")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        for word in progress.learned_words() {
            sqlx::query(
                r"
                INSERT INTO learned_words (english, translation)
                VALUES (?1, ?2)
                ",
            )
            .bind(word.english())
            .bind(word.translation())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        debug!(
            xp = progress.xp(),
            lessons = progress.completed_lessons().len(),
            words = progress.learned_word_count(),
            "saved progress"
        );
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for statement in [
            "DELETE FROM completed_lessons",
            "DELETE FROM learned_words",
            "DELETE FROM progress",
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
