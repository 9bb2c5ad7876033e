use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lesson_core::LessonCatalog;
use lesson_core::model::{
    Achievement, AchievementKind, CelebrationScreen, ChildId, ContentScreen, Lesson, LessonDraft,
    LessonId, LessonProgress, LessonStatus, QuestionId, QuizOption, QuizQuestion, QuizScreen,
    Screen, ScreenKind, Streak,
};
use lesson_core::time::fixed_now;
use services::screens::ScreenBody;
use services::{AdvanceOutcome, AppServices, Clock, Feedback, ScreenInput};
use storage::repository::{
    AchievementRepository, InMemoryRepository, LessonProgressRepository, Storage, StorageError,
    StreakRepository,
};

fn question(id: &str) -> QuizQuestion {
    QuizQuestion {
        id: QuestionId::new(id),
        question: format!("Question {id}?"),
        options: vec![
            QuizOption {
                text: "Right".into(),
                is_correct: true,
                feedback: "Yes!".into(),
            },
            QuizOption {
                text: "Wrong".into(),
                is_correct: false,
                feedback: "Not quite.".into(),
            },
        ],
        explanation: None,
    }
}

fn three_screen_lesson() -> Lesson {
    LessonDraft {
        id: LessonId::new("lesson-9-1"),
        module_id: "module-9".into(),
        title: "Robots Everywhere".into(),
        xp_reward: 40,
        badge_id: Some("robot-spotter".into()),
        screens: vec![
            Screen::new(
                "intro",
                ScreenKind::Content(ContentScreen {
                    title: Some("Hello".into()),
                    body: Some("Robots are **everywhere**.".into()),
                    ..ContentScreen::default()
                }),
            ),
            Screen::new(
                "check",
                ScreenKind::Quiz(QuizScreen {
                    title: None,
                    intro: None,
                    questions: vec![question("q1"), question("q2")],
                }),
            ),
            Screen::new(
                "party",
                ScreenKind::Celebration(CelebrationScreen {
                    title: "You did it!".into(),
                    message: "Great work.".into(),
                    achievements: Vec::new(),
                    xp_earned: Some(40),
                    badge_earned: None,
                    next_lesson_id: None,
                    is_module_complete: true,
                }),
            ),
        ],
        ..LessonDraft::default()
    }
    .validate()
    .unwrap()
}

fn services() -> AppServices {
    let catalog = LessonCatalog::new(1, vec![three_screen_lesson()]).unwrap();
    AppServices::with_storage(&Storage::in_memory(), catalog, Clock::fixed(fixed_now())).unwrap()
}

#[tokio::test]
async fn playing_a_lesson_rewards_once_and_persists_progress() {
    let services = services();
    let child = ChildId::random();
    let id = LessonId::new("lesson-9-1");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let mut player = services
        .start_lesson(&id, child)
        .unwrap()
        .on_complete(move |completion| {
            assert_eq!(completion.xp_awarded, 40);
            counter.fetch_add(1, Ordering::SeqCst);
        });

    assert_eq!(player.advance(), AdvanceOutcome::Advanced { index: 1 });
    assert_eq!(player.advance(), AdvanceOutcome::Blocked);

    let view = player.view().unwrap();
    assert!(!view.button.enabled);
    assert!(matches!(view.body, ScreenBody::Quiz(_)));

    let first = player.apply(ScreenInput::SelectOption {
        question: 0,
        option: 0,
    });
    assert!(matches!(first, Feedback::Answer(ref a) if a.correct));
    assert_eq!(player.advance(), AdvanceOutcome::Blocked);
    let second = player.apply(ScreenInput::SelectOption {
        question: 1,
        option: 1,
    });
    assert!(matches!(second, Feedback::Answer(ref a) if !a.correct && a.correct_option == 0));

    assert_eq!(player.advance(), AdvanceOutcome::Advanced { index: 2 });
    assert_eq!(player.view().unwrap().button.label, "Finish Lesson");

    let AdvanceOutcome::Finished(completion) = player.advance() else {
        panic!("last screen should finish the lesson");
    };
    assert_eq!(completion.score, 50);
    assert!(completion.had_quiz);
    assert_eq!(completion.time_spent_seconds, 0);
    assert_eq!(player.advance(), AdvanceOutcome::AlreadyFinished);
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    services.outbox().flush().await.unwrap();

    let progress = services.progress();
    let record = progress.progress_for_lesson(child, &id).await.unwrap().unwrap();
    assert_eq!(record.status, LessonStatus::Completed);
    assert_eq!(record.score, Some(50));

    let kinds: Vec<AchievementKind> = progress
        .achievements(child)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.kind)
        .collect();
    assert!(kinds.contains(&AchievementKind::Badge("robot-spotter".into())));
    assert!(kinds.contains(&AchievementKind::ModuleComplete(9)));
    assert!(kinds.contains(&AchievementKind::AllComplete));
    assert!(!kinds.contains(&AchievementKind::PerfectQuiz));

    let summary = progress.summary(child).await.unwrap();
    assert_eq!(summary.completed_lessons, vec![id]);
    assert_eq!(summary.total_xp, 40);
    assert_eq!(summary.streak.unwrap().current_streak, 1);
}

#[tokio::test]
async fn replaying_keeps_completion_and_never_duplicates_achievements() {
    let services = services();
    let child = ChildId::random();
    let id = LessonId::new("lesson-9-1");

    for _ in 0..2 {
        let mut player = services.start_lesson(&id, child).unwrap();
        player.advance();
        player.apply(ScreenInput::SelectOption {
            question: 0,
            option: 0,
        });
        player.apply(ScreenInput::SelectOption {
            question: 1,
            option: 0,
        });
        player.advance();
        assert!(matches!(player.advance(), AdvanceOutcome::Finished(ref c) if c.score == 100));
        services.outbox().flush().await.unwrap();
    }

    let progress = services.progress();
    let record = progress.progress_for_lesson(child, &id).await.unwrap().unwrap();
    assert_eq!(record.status, LessonStatus::Completed);

    let achievements = progress.achievements(child).await.unwrap();
    let perfect = achievements
        .iter()
        .filter(|a| a.kind == AchievementKind::PerfectQuiz)
        .count();
    assert_eq!(perfect, 1);
    assert_eq!(achievements.len(), 4);
}

/// In-memory backend whose progress reads lag, like a remote store on a slow link.
#[derive(Clone, Default)]
struct LaggingReads {
    inner: InMemoryRepository,
}

#[async_trait]
impl LessonProgressRepository for LaggingReads {
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        self.inner.upsert_progress(progress).await
    }

    async fn get_progress(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.inner.get_progress(child_id, lesson_id).await
    }

    async fn list_progress(&self, child_id: ChildId) -> Result<Vec<LessonProgress>, StorageError> {
        self.inner.list_progress(child_id).await
    }
}

#[async_trait]
impl AchievementRepository for LaggingReads {
    async fn insert_achievement(&self, achievement: &Achievement) -> Result<bool, StorageError> {
        self.inner.insert_achievement(achievement).await
    }

    async fn list_achievements(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<Achievement>, StorageError> {
        self.inner.list_achievements(child_id).await
    }
}

#[async_trait]
impl StreakRepository for LaggingReads {
    async fn get_streak(&self, child_id: ChildId) -> Result<Option<Streak>, StorageError> {
        self.inner.get_streak(child_id).await
    }

    async fn upsert_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        self.inner.upsert_streak(streak).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_open_write_never_overwrites_completion() {
    let lesson = LessonDraft {
        id: LessonId::new("lesson-9-2"),
        module_id: "module-9".into(),
        title: "Quick Look".into(),
        xp_reward: 10,
        screens: vec![
            Screen::new("intro", ScreenKind::Content(ContentScreen::default())),
            Screen::new(
                "party",
                ScreenKind::Celebration(CelebrationScreen {
                    title: "Done".into(),
                    message: "Nice.".into(),
                    achievements: Vec::new(),
                    xp_earned: None,
                    badge_earned: None,
                    next_lesson_id: None,
                    is_module_complete: false,
                }),
            ),
        ],
        ..LessonDraft::default()
    }
    .validate()
    .unwrap();
    let id = lesson.id().clone();
    let catalog = LessonCatalog::new(1, vec![lesson]).unwrap();
    let storage = Storage::from_backend(LaggingReads::default());
    let services = AppServices::with_storage(&storage, catalog, Clock::fixed(fixed_now())).unwrap();
    let child = ChildId::random();

    let mut player = services.start_lesson(&id, child).unwrap();
    assert_eq!(player.advance(), AdvanceOutcome::Advanced { index: 1 });
    assert!(matches!(player.advance(), AdvanceOutcome::Finished(_)));

    assert_eq!(services.outbox().flush().await.unwrap(), 2);
    let record = services
        .progress()
        .progress_for_lesson(child, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, LessonStatus::Completed);
    assert_eq!(record.score, Some(100));
}
