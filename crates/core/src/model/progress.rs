use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{BadgeId, ChildId, LessonId, ModuleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressRecordError {
    #[error("invalid lesson status: {0}")]
    InvalidStatus(String),

    #[error("score must be between 0 and 100, got {0}")]
    InvalidScore(u32),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a learner's progress through one lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl LessonStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::NotStarted => "not_started",
            LessonStatus::InProgress => "in_progress",
            LessonStatus::Completed => "completed",
        }
    }

    /// Parses the storage encoding produced by `as_str`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressRecordError::InvalidStatus` for unknown values.
    pub fn parse(s: &str) -> Result<Self, ProgressRecordError> {
        match s {
            "not_started" => Ok(LessonStatus::NotStarted),
            "in_progress" => Ok(LessonStatus::InProgress),
            "completed" => Ok(LessonStatus::Completed),
            other => Err(ProgressRecordError::InvalidStatus(other.to_owned())),
        }
    }
}

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// Persisted progress record for one child and one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub child_id: ChildId,
    pub lesson_id: LessonId,
    pub module_id: ModuleId,
    pub status: LessonStatus,
    pub score: Option<u32>,
    pub time_spent_seconds: u64,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    /// Fresh in-progress record, written when a learner opens a lesson.
    #[must_use]
    pub fn started(child_id: ChildId, lesson_id: LessonId, module_id: ModuleId) -> Self {
        Self {
            child_id,
            lesson_id,
            module_id,
            status: LessonStatus::InProgress,
            score: None,
            time_spent_seconds: 0,
            completed_at: None,
        }
    }

    /// Completed record built from a finished playback session.
    #[must_use]
    pub fn completed(child_id: ChildId, completion: &LessonCompletion) -> Self {
        Self {
            child_id,
            lesson_id: completion.lesson_id.clone(),
            module_id: completion.module_id.clone(),
            status: LessonStatus::Completed,
            score: Some(completion.score),
            time_spent_seconds: completion.time_spent_seconds,
            completed_at: Some(completion.completed_at),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == LessonStatus::Completed
    }
}

//
// ─── COMPLETION ────────────────────────────────────────────────────────────────
//

/// Reward event emitted exactly once when a playback session passes its last screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    pub lesson_id: LessonId,
    pub module_id: ModuleId,
    pub xp_awarded: u32,
    pub badge: Option<BadgeId>,
    /// Percentage of quiz questions answered correctly; 100 when the lesson has no quiz.
    pub score: u32,
    pub had_quiz: bool,
    pub time_spent_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl LessonCompletion {
    /// Whether the learner got every quiz question right on a lesson that had a quiz.
    #[must_use]
    pub fn is_perfect_quiz(&self) -> bool {
        self.had_quiz && self.score == 100
    }
}

/// Rounds `correct / total` to a whole percentage, 100 when there is nothing to score.
#[must_use]
pub fn percentage_score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let correct = correct.min(total);
    let pct = (correct * 200 + total) / (total * 2);
    u32::try_from(pct).unwrap_or(100)
}
