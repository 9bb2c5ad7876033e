use chrono::{DateTime, NaiveDate, Utc};
use lesson_core::model::{
    Achievement, AchievementKind, ChildId, LessonId, LessonProgress, LessonStatus, ModuleId,
    Streak,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

/// Child ids are stored as hyphenated UUID text so rows stay readable.
pub(crate) fn child_id_to_text(id: ChildId) -> String {
    id.value().hyphenated().to_string()
}

fn child_id_from_row(row: &SqliteRow) -> Result<ChildId, StorageError> {
    row.try_get::<String, _>("child_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<LessonProgress, StorageError> {
    let status: String = row.try_get("status").map_err(ser)?;
    let time_spent: i64 = row.try_get("time_spent_seconds").map_err(ser)?;

    Ok(LessonProgress {
        child_id: child_id_from_row(row)?,
        lesson_id: LessonId::new(row.try_get::<String, _>("lesson_id").map_err(ser)?),
        module_id: ModuleId::new(row.try_get::<String, _>("module_id").map_err(ser)?),
        status: LessonStatus::parse(&status).map_err(ser)?,
        score: row
            .try_get::<Option<i64>, _>("score")
            .map_err(ser)?
            .map(|s| i64_to_u32("score", s))
            .transpose()?,
        time_spent_seconds: u64::try_from(time_spent).map_err(|_| {
            StorageError::Serialization(format!("invalid time_spent_seconds: {time_spent}"))
        })?,
        completed_at: row
            .try_get::<Option<DateTime<Utc>>, _>("completed_at")
            .map_err(ser)?,
    })
}

pub(crate) fn map_achievement_row(row: &SqliteRow) -> Result<Achievement, StorageError> {
    let kind: AchievementKind = row
        .try_get::<String, _>("achievement_type")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    Ok(Achievement::new(
        child_id_from_row(row)?,
        kind,
        row.try_get("earned_at").map_err(ser)?,
    ))
}

pub(crate) fn map_streak_row(row: &SqliteRow) -> Result<Streak, StorageError> {
    Ok(Streak {
        child_id: child_id_from_row(row)?,
        current_streak: i64_to_u32(
            "current_streak",
            row.try_get("current_streak").map_err(ser)?,
        )?,
        longest_streak: i64_to_u32(
            "longest_streak",
            row.try_get("longest_streak").map_err(ser)?,
        )?,
        last_activity_date: row
            .try_get::<Option<NaiveDate>, _>("last_activity_date")
            .map_err(ser)?,
    })
}
