use async_trait::async_trait;
use lesson_core::model::{Achievement, AchievementKind, ChildId, LessonId, LessonProgress, Streak};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-lesson progress records.
#[async_trait]
pub trait LessonProgressRepository: Send + Sync {
    /// Insert or replace the record for `(child_id, lesson_id)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError>;

    /// Fetch the record for one child and lesson.
    ///
    /// Returns `Ok(None)` when the learner never opened the lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_progress(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, StorageError>;

    /// List every record for a child, ordered by lesson id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(&self, child_id: ChildId) -> Result<Vec<LessonProgress>, StorageError>;
}

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Record an achievement unless the child already holds one of the same kind.
    ///
    /// Returns `true` when a new row was written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the achievement cannot be stored.
    async fn insert_achievement(&self, achievement: &Achievement) -> Result<bool, StorageError>;

    /// List achievements for a child in the order they were earned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_achievements(&self, child_id: ChildId)
    -> Result<Vec<Achievement>, StorageError>;
}

#[async_trait]
pub trait StreakRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_streak(&self, child_id: ChildId) -> Result<Option<Streak>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the streak cannot be stored.
    async fn upsert_streak(&self, streak: &Streak) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and offline play.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<(ChildId, LessonId), LessonProgress>>>,
    achievements: Arc<Mutex<Vec<Achievement>>>,
    streaks: Arc<Mutex<HashMap<ChildId, Streak>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl LessonProgressRepository for InMemoryRepository {
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        guard.insert(
            (progress.child_id, progress.lesson_id.clone()),
            progress.clone(),
        );
        Ok(())
    }

    async fn get_progress(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(&(child_id, lesson_id.clone())).cloned())
    }

    async fn list_progress(&self, child_id: ChildId) -> Result<Vec<LessonProgress>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        let mut rows: Vec<_> = guard
            .values()
            .filter(|p| p.child_id == child_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.lesson_id.cmp(&b.lesson_id));
        Ok(rows)
    }
}

#[async_trait]
impl AchievementRepository for InMemoryRepository {
    async fn insert_achievement(&self, achievement: &Achievement) -> Result<bool, StorageError> {
        let mut guard = self.achievements.lock().map_err(poisoned)?;
        if holds(&guard, achievement.child_id, &achievement.kind) {
            return Ok(false);
        }
        guard.push(achievement.clone());
        Ok(true)
    }

    async fn list_achievements(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<Achievement>, StorageError> {
        let guard = self.achievements.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|a| a.child_id == child_id)
            .cloned()
            .collect())
    }
}

fn holds(achievements: &[Achievement], child_id: ChildId, kind: &AchievementKind) -> bool {
    achievements
        .iter()
        .any(|a| a.child_id == child_id && &a.kind == kind)
}

#[async_trait]
impl StreakRepository for InMemoryRepository {
    async fn get_streak(&self, child_id: ChildId) -> Result<Option<Streak>, StorageError> {
        let guard = self.streaks.lock().map_err(poisoned)?;
        Ok(guard.get(&child_id).cloned())
    }

    async fn upsert_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        let mut guard = self.streaks.lock().map_err(poisoned)?;
        guard.insert(streak.child_id, streak.clone());
        Ok(())
    }
}

/// Aggregates the progress-sink repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn LessonProgressRepository>,
    pub achievements: Arc<dyn AchievementRepository>,
    pub streaks: Arc<dyn StreakRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(InMemoryRepository::new())
    }

    /// Wire a single backend implementing every repository into all three slots.
    #[must_use]
    pub fn from_backend<R>(repo: R) -> Self
    where
        R: LessonProgressRepository + AchievementRepository + StreakRepository + Clone + 'static,
    {
        let progress: Arc<dyn LessonProgressRepository> = Arc::new(repo.clone());
        let achievements: Arc<dyn AchievementRepository> = Arc::new(repo.clone());
        let streaks: Arc<dyn StreakRepository> = Arc::new(repo);
        Self {
            progress,
            achievements,
            streaks,
        }
    }
}
