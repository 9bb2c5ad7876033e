use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::{BadgeId, ItemId, LessonId, ModuleId, QuestionId, ScreenId};
use crate::model::screen::{Screen, ScreenKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson {0} has no screens")]
    NoScreens(LessonId),

    #[error("duplicate screen id {0}")]
    DuplicateScreen(ScreenId),

    #[error("quiz screen {screen} has no questions")]
    EmptyQuiz { screen: ScreenId },

    #[error("question {question} on screen {screen} needs at least two options and exactly one correct answer")]
    InvalidQuestion {
        screen: ScreenId,
        question: QuestionId,
    },

    #[error("sorting screen {screen} needs at least one category and one item")]
    EmptySorting { screen: ScreenId },

    #[error("item {item} on screen {screen} points at an unknown category")]
    UnknownCategory { screen: ScreenId, item: ItemId },

    #[error("duplicate item id {item} on screen {screen}")]
    DuplicateItem { screen: ScreenId, item: ItemId },

    #[error("scavenger screen {screen} requires {min} findings but only has {items} items")]
    UnreachableScavengerMinimum {
        screen: ScreenId,
        min: usize,
        items: usize,
    },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Authoring shape of a lesson before validation.
#[derive(Debug, Clone, Default)]
pub struct LessonDraft {
    pub id: LessonId,
    pub module_id: ModuleId,
    pub title: String,
    pub subtitle: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub xp_reward: u32,
    pub badge_id: Option<BadgeId>,
    pub prerequisite: Option<LessonId>,
    pub is_project_lesson: bool,
    pub screens: Vec<Screen>,
}

impl LessonDraft {
    /// Validate the draft into an immutable `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank, there are no screens, screen ids
    /// repeat, or any screen payload is internally inconsistent.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        if self.title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if self.screens.is_empty() {
            return Err(LessonError::NoScreens(self.id));
        }

        let mut seen = HashSet::with_capacity(self.screens.len());
        for screen in &self.screens {
            if !seen.insert(screen.id()) {
                return Err(LessonError::DuplicateScreen(screen.id().clone()));
            }
            screen.validate()?;
        }

        Ok(Lesson {
            id: self.id,
            module_id: self.module_id,
            title: self.title,
            subtitle: self.subtitle,
            duration: self.duration,
            difficulty: self.difficulty,
            xp_reward: self.xp_reward,
            badge_id: self.badge_id,
            prerequisite: self.prerequisite,
            is_project_lesson: self.is_project_lesson,
            screens: self.screens,
        })
    }
}

/// A validated, immutable lesson: an ordered sequence of typed screens plus its reward.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    module_id: ModuleId,
    title: String,
    subtitle: String,
    duration: String,
    difficulty: Difficulty,
    xp_reward: u32,
    badge_id: Option<BadgeId>,
    prerequisite: Option<LessonId>,
    is_project_lesson: bool,
    screens: Vec<Screen>,
}

impl Lesson {
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn badge_id(&self) -> Option<&BadgeId> {
        self.badge_id.as_ref()
    }

    #[must_use]
    pub fn prerequisite(&self) -> Option<&LessonId> {
        self.prerequisite.as_ref()
    }

    #[must_use]
    pub fn is_project_lesson(&self) -> bool {
        self.is_project_lesson
    }

    #[must_use]
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    /// Number of screens; always at least one.
    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    #[must_use]
    pub fn screen(&self, index: usize) -> Option<&Screen> {
        self.screens.get(index)
    }

    /// Total number of quiz questions across all quiz screens.
    #[must_use]
    pub fn quiz_question_count(&self) -> usize {
        self.screens
            .iter()
            .map(|s| match s.kind() {
                ScreenKind::Quiz(quiz) => quiz.questions.len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::screen::ContentScreen;

    fn draft(screens: Vec<Screen>) -> LessonDraft {
        LessonDraft {
            id: "lesson-x".into(),
            module_id: "module-1".into(),
            title: "Test".into(),
            xp_reward: 10,
            screens,
            ..LessonDraft::default()
        }
    }

    fn content(id: &str) -> Screen {
        Screen::new(id, ScreenKind::Content(ContentScreen::default()))
    }

    #[test]
    fn lesson_requires_screens() {
        let err = draft(vec![]).validate().unwrap_err();
        assert_eq!(err, LessonError::NoScreens("lesson-x".into()));
    }

    #[test]
    fn lesson_rejects_duplicate_screen_ids() {
        let err = draft(vec![content("a"), content("a")]).validate().unwrap_err();
        assert_eq!(err, LessonError::DuplicateScreen("a".into()));
    }

    #[test]
    fn lesson_rejects_blank_title() {
        let mut d = draft(vec![content("a")]);
        d.title = "  ".into();
        assert_eq!(d.validate().unwrap_err(), LessonError::EmptyTitle);
    }

    #[test]
    fn valid_lesson_exposes_screens() {
        let lesson = draft(vec![content("a"), content("b")]).validate().unwrap();
        assert_eq!(lesson.screen_count(), 2);
        assert_eq!(lesson.screen(1).unwrap().id().as_str(), "b");
        assert_eq!(lesson.quiz_question_count(), 0);
    }
}
