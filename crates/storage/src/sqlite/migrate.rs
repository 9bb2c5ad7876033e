use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Applies pending schema versions, each inside its own transaction.
///
/// Version 1 holds the progress sink: lesson progress, achievements and streaks.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS lesson_progress (
                child_id TEXT NOT NULL,
                lesson_id TEXT NOT NULL,
                module_id TEXT NOT NULL,
                status TEXT NOT NULL
                    CHECK (status IN ('not_started', 'in_progress', 'completed')),
                score INTEGER CHECK (score BETWEEN 0 AND 100),
                time_spent_seconds INTEGER NOT NULL CHECK (time_spent_seconds >= 0),
                completed_at TEXT,
                PRIMARY KEY (child_id, lesson_id)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS achievements (
                id INTEGER PRIMARY KEY,
                child_id TEXT NOT NULL,
                achievement_type TEXT NOT NULL,
                earned_at TEXT NOT NULL,
                UNIQUE (child_id, achievement_type)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS streaks (
                child_id TEXT PRIMARY KEY,
                current_streak INTEGER NOT NULL CHECK (current_streak >= 0),
                longest_streak INTEGER NOT NULL CHECK (longest_streak >= 0),
                last_activity_date TEXT
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_lesson_progress_child_module
                ON lesson_progress (child_id, module_id);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(version = 1, "applied sqlite migration");

    Ok(())
}
