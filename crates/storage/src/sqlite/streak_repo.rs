use async_trait::async_trait;
use lesson_core::model::{ChildId, Streak};

use super::SqliteRepository;
use super::mapping::{child_id_to_text, conn, map_streak_row};
use crate::repository::{StorageError, StreakRepository};

#[async_trait]
impl StreakRepository for SqliteRepository {
    async fn get_streak(&self, child_id: ChildId) -> Result<Option<Streak>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT child_id, current_streak, longest_streak, last_activity_date
            FROM streaks
            WHERE child_id = ?1
            ",
        )
        .bind(child_id_to_text(child_id))
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        row.as_ref().map(map_streak_row).transpose()
    }

    async fn upsert_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO streaks (child_id, current_streak, longest_streak, last_activity_date)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(child_id) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_activity_date = excluded.last_activity_date
            ",
        )
        .bind(child_id_to_text(streak.child_id))
        .bind(i64::from(streak.current_streak))
        .bind(i64::from(streak.longest_streak))
        .bind(streak.last_activity_date)
        .execute(self.pool())
        .await
        .map_err(conn)?;

        tracing::debug!(
            child = %streak.child_id,
            current = streak.current_streak,
            "stored streak"
        );
        Ok(())
    }
}
