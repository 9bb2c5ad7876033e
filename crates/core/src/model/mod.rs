mod achievement;
mod ids;
mod lesson;
mod progress;
mod screen;
mod streak;

pub use ids::{
    BadgeId, CategoryId, ChildId, ItemId, LessonId, ModuleId, ParseIdError, QuestionId, ScreenId,
};

pub use achievement::{Achievement, AchievementKind, AchievementParseError};
pub use lesson::{Difficulty, Lesson, LessonDraft, LessonError};
pub use progress::{
    LessonCompletion, LessonProgress, LessonStatus, ProgressRecordError, percentage_score,
};
pub use screen::{
    AnimationStep, CelebrationScreen, ComparisonColumn, ContentScreen, DiscussionScreen,
    MascotExpression, QuizOption, QuizQuestion, QuizScreen, ReflectionScreen, ScavengerItem,
    ScavengerScreen, Screen, ScreenKind, SortCategory, SortItem, SortingScreen, Visual,
};
pub use streak::{Streak, StreakChange};
