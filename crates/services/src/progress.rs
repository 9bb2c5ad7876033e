use std::collections::HashSet;
use std::sync::Arc;

use lesson_core::LessonCatalog;
use lesson_core::model::{
    Achievement, AchievementKind, ChildId, LessonCompletion, LessonId, LessonProgress,
    LessonStatus, ModuleId, Streak, StreakChange,
};
use storage::repository::{
    AchievementRepository, LessonProgressRepository, Storage, StreakRepository,
};

use crate::Clock;
use crate::error::ProgressError;

/// What a completion changed beyond the lesson record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub streak: StreakChange,
    /// Achievements newly earned by this completion, in award order.
    pub awarded: Vec<AchievementKind>,
}

/// Dashboard totals for one learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed_lessons: Vec<LessonId>,
    /// Sum of recorded scores across every lesson record.
    pub total_score: u32,
    pub total_time_spent_seconds: u64,
    /// Catalog XP of the completed lessons.
    pub total_xp: u32,
    pub streak: Option<Streak>,
    pub achievements: Vec<Achievement>,
}

/// Writes lesson progress, streaks and achievements and answers dashboard reads.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<LessonCatalog>,
    progress: Arc<dyn LessonProgressRepository>,
    achievements: Arc<dyn AchievementRepository>,
    streaks: Arc<dyn StreakRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<LessonCatalog>,
        progress: Arc<dyn LessonProgressRepository>,
        achievements: Arc<dyn AchievementRepository>,
        streaks: Arc<dyn StreakRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
            achievements,
            streaks,
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, catalog: Arc<LessonCatalog>, storage: &Storage) -> Self {
        Self::new(
            clock,
            catalog,
            Arc::clone(&storage.progress),
            Arc::clone(&storage.achievements),
            Arc::clone(&storage.streaks),
        )
    }

    /// Mark a lesson as in progress when the learner opens it.
    ///
    /// Completed lessons stay completed; replaying one does not reset it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn record_screen_entered(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
        module_id: &ModuleId,
    ) -> Result<(), ProgressError> {
        let existing = self.progress.get_progress(child_id, lesson_id).await?;
        if existing.is_some_and(|p| p.status != LessonStatus::NotStarted) {
            return Ok(());
        }
        let started = LessonProgress::started(child_id, lesson_id.clone(), module_id.clone());
        self.progress.upsert_progress(&started).await?;
        tracing::debug!(child = %child_id, lesson = %lesson_id, "lesson in progress");
        Ok(())
    }

    /// Persist a finished lesson and award whatever it unlocked.
    ///
    /// Achievements are inserted idempotently, so replaying a completion never
    /// awards the same kind twice.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn record_completion(
        &self,
        child_id: ChildId,
        completion: &LessonCompletion,
    ) -> Result<CompletionOutcome, ProgressError> {
        self.progress
            .upsert_progress(&LessonProgress::completed(child_id, completion))
            .await?;

        let streak = self.update_streak(child_id).await?;

        let mut candidates = Vec::new();
        if let Some(kind) = streak
            .updated()
            .and_then(|s| AchievementKind::for_streak(s.current_streak))
        {
            candidates.push(kind);
        }
        if let Some(badge) = &completion.badge {
            candidates.push(AchievementKind::Badge(badge.clone()));
        }
        if completion.is_perfect_quiz() {
            candidates.push(AchievementKind::PerfectQuiz);
        }
        candidates.extend(self.completion_milestones(child_id, &completion.module_id).await?);

        let earned_at = self.clock.now();
        let mut awarded = Vec::new();
        for kind in candidates {
            let achievement = Achievement::new(child_id, kind.clone(), earned_at);
            if self.achievements.insert_achievement(&achievement).await? {
                awarded.push(kind);
            }
        }

        tracing::info!(
            child = %child_id,
            lesson = %completion.lesson_id,
            score = completion.score,
            xp = completion.xp_awarded,
            awarded = awarded.len(),
            "lesson completed"
        );
        Ok(CompletionOutcome { streak, awarded })
    }

    async fn update_streak(&self, child_id: ChildId) -> Result<StreakChange, ProgressError> {
        let existing = self.streaks.get_streak(child_id).await?;
        let change = Streak::record_activity(existing.as_ref(), child_id, self.clock.today());
        if let Some(updated) = change.updated() {
            self.streaks.upsert_streak(updated).await?;
        }
        Ok(change)
    }

    async fn completion_milestones(
        &self,
        child_id: ChildId,
        module_id: &ModuleId,
    ) -> Result<Vec<AchievementKind>, ProgressError> {
        let done: HashSet<LessonId> = self.completed_lessons(child_id).await?.into_iter().collect();
        let mut kinds = Vec::new();

        let mut module_lessons = self.catalog.lessons_in_module(module_id).peekable();
        let module_started = module_lessons.peek().is_some();
        if module_started && module_lessons.all(|l| done.contains(l.id())) {
            kinds.extend(AchievementKind::module_complete(module_id));
        }

        if !self.catalog.is_empty() && self.catalog.lessons().iter().all(|l| done.contains(l.id())) {
            kinds.push(AchievementKind::AllComplete);
        }
        Ok(kinds)
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn progress_for_lesson(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, ProgressError> {
        Ok(self.progress.get_progress(child_id, lesson_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn completed_lessons(&self, child_id: ChildId) -> Result<Vec<LessonId>, ProgressError> {
        Ok(self
            .progress
            .list_progress(child_id)
            .await?
            .into_iter()
            .filter(LessonProgress::is_completed)
            .map(|p| p.lesson_id)
            .collect())
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn achievements(&self, child_id: ChildId) -> Result<Vec<Achievement>, ProgressError> {
        Ok(self.achievements.list_achievements(child_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn streak(&self, child_id: ChildId) -> Result<Option<Streak>, ProgressError> {
        Ok(self.streaks.get_streak(child_id).await?)
    }

    /// Totals shown on the learner dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if repository access fails.
    pub async fn summary(&self, child_id: ChildId) -> Result<ProgressSummary, ProgressError> {
        let records = self.progress.list_progress(child_id).await?;

        let completed_lessons: Vec<LessonId> = records
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.lesson_id.clone())
            .collect();
        let total_score = records
            .iter()
            .filter_map(|p| p.score)
            .fold(0_u32, u32::saturating_add);
        let total_time_spent_seconds = records
            .iter()
            .map(|p| p.time_spent_seconds)
            .fold(0_u64, u64::saturating_add);
        let total_xp = completed_lessons
            .iter()
            .map(|id| self.catalog.xp_for(id))
            .fold(0_u32, u32::saturating_add);

        Ok(ProgressSummary {
            completed_lessons,
            total_score,
            total_time_spent_seconds,
            total_xp,
            streak: self.streaks.get_streak(child_id).await?,
            achievements: self.achievements.list_achievements(child_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lesson_core::model::BadgeId;
    use lesson_core::time::fixed_now;
    use uuid::Uuid;

    fn child() -> ChildId {
        ChildId::new(Uuid::from_u128(11))
    }

    fn service(clock: Clock, storage: &Storage) -> ProgressService {
        let catalog = Arc::new(LessonCatalog::builtin().unwrap());
        ProgressService::from_storage(clock, catalog, storage)
    }

    fn completion(lesson: &str, score: u32, had_quiz: bool, badge: Option<&str>) -> LessonCompletion {
        LessonCompletion {
            lesson_id: LessonId::new(lesson),
            module_id: ModuleId::new("module-1"),
            xp_awarded: 50,
            badge: badge.map(BadgeId::new),
            score,
            had_quiz,
            time_spent_seconds: 300,
            completed_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn opening_a_lesson_marks_it_in_progress_once() {
        let storage = Storage::in_memory();
        let svc = service(Clock::fixed(fixed_now()), &storage);
        let lesson = LessonId::new("lesson-1-1");
        let module = ModuleId::new("module-1");

        svc.record_screen_entered(child(), &lesson, &module).await.unwrap();
        let progress = svc.progress_for_lesson(child(), &lesson).await.unwrap().unwrap();
        assert_eq!(progress.status, LessonStatus::InProgress);

        svc.record_completion(child(), &completion("lesson-1-1", 100, true, None))
            .await
            .unwrap();
        svc.record_screen_entered(child(), &lesson, &module).await.unwrap();
        let progress = svc.progress_for_lesson(child(), &lesson).await.unwrap().unwrap();
        assert_eq!(progress.status, LessonStatus::Completed);
    }

    #[tokio::test]
    async fn completion_awards_badge_and_perfect_quiz_once() {
        let storage = Storage::in_memory();
        let svc = service(Clock::fixed(fixed_now()), &storage);
        let done = completion("lesson-1-1", 100, true, Some("first-lesson"));

        let first = svc.record_completion(child(), &done).await.unwrap();
        assert_eq!(
            first.awarded,
            vec![
                AchievementKind::Badge(BadgeId::new("first-lesson")),
                AchievementKind::PerfectQuiz,
            ]
        );
        assert!(matches!(first.streak, StreakChange::Started(_)));

        let again = svc.record_completion(child(), &done).await.unwrap();
        assert!(again.awarded.is_empty());
        assert_eq!(again.streak, StreakChange::Unchanged);
    }

    #[tokio::test]
    async fn no_quiz_lesson_is_not_a_perfect_quiz() {
        let storage = Storage::in_memory();
        let svc = service(Clock::fixed(fixed_now()), &storage);
        let outcome = svc
            .record_completion(child(), &completion("lesson-1-3", 100, false, None))
            .await
            .unwrap();
        assert!(!outcome.awarded.contains(&AchievementKind::PerfectQuiz));
    }

    #[tokio::test]
    async fn finishing_every_module_lesson_awards_module_and_all_complete() {
        let storage = Storage::in_memory();
        let svc = service(Clock::fixed(fixed_now()), &storage);

        for lesson in ["lesson-1-1", "lesson-1-2"] {
            let outcome = svc
                .record_completion(child(), &completion(lesson, 50, true, None))
                .await
                .unwrap();
            assert!(!outcome.awarded.contains(&AchievementKind::ModuleComplete(1)));
        }
        let last = svc
            .record_completion(child(), &completion("lesson-1-3", 100, false, None))
            .await
            .unwrap();
        assert!(last.awarded.contains(&AchievementKind::ModuleComplete(1)));
        assert!(last.awarded.contains(&AchievementKind::AllComplete));
    }

    #[tokio::test]
    async fn third_consecutive_day_awards_streak_3() {
        let storage = Storage::in_memory();
        let mut clock = Clock::fixed(fixed_now());
        let mut awarded = Vec::new();
        for lesson in ["lesson-1-1", "lesson-1-2", "lesson-1-3"] {
            let svc = service(clock, &storage);
            let outcome = svc
                .record_completion(child(), &completion(lesson, 50, true, None))
                .await
                .unwrap();
            awarded.extend(outcome.awarded);
            clock.advance(Duration::days(1));
        }
        assert!(awarded.contains(&AchievementKind::Streak3));

        let streak = storage.streaks.get_streak(child()).await.unwrap().unwrap();
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
    }

    #[tokio::test]
    async fn summary_totals_scores_time_and_xp() {
        let storage = Storage::in_memory();
        let svc = service(Clock::fixed(fixed_now()), &storage);
        svc.record_completion(child(), &completion("lesson-1-1", 80, true, Some("first-lesson")))
            .await
            .unwrap();
        svc.record_screen_entered(child(), &LessonId::new("lesson-1-2"), &ModuleId::new("module-1"))
            .await
            .unwrap();

        let summary = svc.summary(child()).await.unwrap();
        assert_eq!(summary.completed_lessons, vec![LessonId::new("lesson-1-1")]);
        assert_eq!(summary.total_score, 80);
        assert_eq!(summary.total_time_spent_seconds, 300);
        assert_eq!(summary.total_xp, 50);
        assert_eq!(summary.streak.map(|s| s.current_streak), Some(1));
        assert_eq!(summary.achievements.len(), 1);

        let stranger = svc.summary(ChildId::new(Uuid::from_u128(99))).await.unwrap();
        assert!(stranger.completed_lessons.is_empty());
        assert!(stranger.streak.is_none());
    }
}
