use async_trait::async_trait;
use lesson_core::model::{ChildId, LessonId, LessonProgress};

use super::SqliteRepository;
use super::mapping::{child_id_to_text, conn, map_progress_row, u64_to_i64};
use crate::repository::{LessonProgressRepository, StorageError};

#[async_trait]
impl LessonProgressRepository for SqliteRepository {
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO lesson_progress (
                child_id, lesson_id, module_id, status, score, time_spent_seconds, completed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(child_id, lesson_id) DO UPDATE SET
                module_id = excluded.module_id,
                status = excluded.status,
                score = excluded.score,
                time_spent_seconds = excluded.time_spent_seconds,
                completed_at = excluded.completed_at
            ",
        )
        .bind(child_id_to_text(progress.child_id))
        .bind(progress.lesson_id.as_str())
        .bind(progress.module_id.as_str())
        .bind(progress.status.as_str())
        .bind(progress.score.map(i64::from))
        .bind(u64_to_i64("time_spent_seconds", progress.time_spent_seconds)?)
        .bind(progress.completed_at)
        .execute(self.pool())
        .await
        .map_err(conn)?;

        tracing::debug!(
            child = %progress.child_id,
            lesson = %progress.lesson_id,
            status = progress.status.as_str(),
            "stored lesson progress"
        );
        Ok(())
    }

    async fn get_progress(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT child_id, lesson_id, module_id, status, score, time_spent_seconds, completed_at
            FROM lesson_progress
            WHERE child_id = ?1 AND lesson_id = ?2
            ",
        )
        .bind(child_id_to_text(child_id))
        .bind(lesson_id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn list_progress(&self, child_id: ChildId) -> Result<Vec<LessonProgress>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT child_id, lesson_id, module_id, status, score, time_spent_seconds, completed_at
            FROM lesson_progress
            WHERE child_id = ?1
            ORDER BY lesson_id ASC
            ",
        )
        .bind(child_id_to_text(child_id))
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        rows.iter().map(map_progress_row).collect()
    }
}
