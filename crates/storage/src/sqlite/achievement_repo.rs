use async_trait::async_trait;
use lesson_core::model::{Achievement, ChildId};

use super::SqliteRepository;
use super::mapping::{child_id_to_text, conn, map_achievement_row};
use crate::repository::{AchievementRepository, StorageError};

#[async_trait]
impl AchievementRepository for SqliteRepository {
    async fn insert_achievement(&self, achievement: &Achievement) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO achievements (child_id, achievement_type, earned_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(child_id, achievement_type) DO NOTHING
            ",
        )
        .bind(child_id_to_text(achievement.child_id))
        .bind(achievement.kind.to_string())
        .bind(achievement.earned_at)
        .execute(self.pool())
        .await
        .map_err(conn)?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            tracing::debug!(
                child = %achievement.child_id,
                kind = %achievement.kind,
                "stored achievement"
            );
        }
        Ok(inserted)
    }

    async fn list_achievements(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<Achievement>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT child_id, achievement_type, earned_at
            FROM achievements
            WHERE child_id = ?1
            ORDER BY earned_at ASC, id ASC
            ",
        )
        .bind(child_id_to_text(child_id))
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        rows.iter().map(map_achievement_row).collect()
    }
}
