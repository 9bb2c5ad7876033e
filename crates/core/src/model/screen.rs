use std::collections::HashSet;

use serde::Deserialize;

use crate::model::ids::{CategoryId, ItemId, LessonId, QuestionId, ScreenId};
use crate::model::lesson::LessonError;

//
// ─── SCREEN ────────────────────────────────────────────────────────────────────
//

/// Mascot pose hint attached to a screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MascotExpression {
    #[default]
    Default,
    Happy,
    Excited,
    Thinking,
    Explaining,
}

/// One page of a lesson's interactive sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    id: ScreenId,
    mascot: Option<MascotExpression>,
    kind: ScreenKind,
}

impl Screen {
    #[must_use]
    pub fn new(id: impl Into<ScreenId>, kind: ScreenKind) -> Self {
        Self {
            id: id.into(),
            mascot: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_mascot(mut self, mascot: MascotExpression) -> Self {
        self.mascot = Some(mascot);
        self
    }

    #[must_use]
    pub fn id(&self) -> &ScreenId {
        &self.id
    }

    #[must_use]
    pub fn mascot(&self) -> Option<MascotExpression> {
        self.mascot
    }

    #[must_use]
    pub fn kind(&self) -> &ScreenKind {
        &self.kind
    }

    pub(crate) fn validate(&self) -> Result<(), LessonError> {
        self.kind.validate(&self.id)
    }
}

/// Interaction payload of a screen, one variant per screen type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenKind {
    Content(ContentScreen),
    Quiz(QuizScreen),
    Sorting(SortingScreen),
    Scavenger(ScavengerScreen),
    Reflection(ReflectionScreen),
    Celebration(CelebrationScreen),
    Discussion(DiscussionScreen),
    /// Authored content named a screen type this build does not know.
    Unsupported { kind: String },
}

impl ScreenKind {
    /// Stable tag used by authored content.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            ScreenKind::Content(_) => "content",
            ScreenKind::Quiz(_) => "quiz",
            ScreenKind::Sorting(_) => "sorting",
            ScreenKind::Scavenger(_) => "scavenger",
            ScreenKind::Reflection(_) => "reflection",
            ScreenKind::Celebration(_) => "celebration",
            ScreenKind::Discussion(_) => "discussion",
            ScreenKind::Unsupported { kind } => kind,
        }
    }

    /// True when advancement waits on a completion predicate.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        match self {
            ScreenKind::Quiz(_) | ScreenKind::Sorting(_) | ScreenKind::Scavenger(_) => true,
            ScreenKind::Content(_)
            | ScreenKind::Reflection(_)
            | ScreenKind::Celebration(_)
            | ScreenKind::Discussion(_)
            | ScreenKind::Unsupported { .. } => false,
        }
    }

    fn validate(&self, screen: &ScreenId) -> Result<(), LessonError> {
        match self {
            ScreenKind::Quiz(quiz) => quiz.validate(screen),
            ScreenKind::Sorting(sorting) => sorting.validate(screen),
            ScreenKind::Scavenger(hunt) => hunt.validate(screen),
            ScreenKind::Content(_)
            | ScreenKind::Reflection(_)
            | ScreenKind::Celebration(_)
            | ScreenKind::Discussion(_)
            | ScreenKind::Unsupported { .. } => Ok(()),
        }
    }
}

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentScreen {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mascot_message: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub visual: Option<Visual>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
}

/// Illustration attached to a content screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Visual {
    Animation {
        steps: Vec<AnimationStep>,
    },
    Grid {
        images: Vec<String>,
        result: String,
    },
    Comparison {
        left: ComparisonColumn,
        right: ComparisonColumn,
    },
    Icon {
        icon: String,
        #[serde(default)]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimationStep {
    pub icon: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComparisonColumn {
    pub title: String,
    pub items: Vec<String>,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScreen {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<QuizOption>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
    pub feedback: String,
}

impl QuizQuestion {
    /// Index of the single correct option.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }
}

impl QuizScreen {
    fn validate(&self, screen: &ScreenId) -> Result<(), LessonError> {
        if self.questions.is_empty() {
            return Err(LessonError::EmptyQuiz {
                screen: screen.clone(),
            });
        }
        for question in &self.questions {
            let correct = question.options.iter().filter(|o| o.is_correct).count();
            if question.options.len() < 2 || correct != 1 {
                return Err(LessonError::InvalidQuestion {
                    screen: screen.clone(),
                    question: question.id.clone(),
                });
            }
        }
        Ok(())
    }
}

//
// ─── SORTING ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortingScreen {
    pub title: String,
    pub instructions: String,
    pub categories: Vec<SortCategory>,
    pub items: Vec<SortItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortCategory {
    pub id: CategoryId,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortItem {
    pub id: ItemId,
    pub content: String,
    pub correct_category: CategoryId,
    pub explanation: String,
}

impl SortingScreen {
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&SortCategory> {
        self.categories.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&SortItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn validate(&self, screen: &ScreenId) -> Result<(), LessonError> {
        if self.categories.is_empty() || self.items.is_empty() {
            return Err(LessonError::EmptySorting {
                screen: screen.clone(),
            });
        }
        if let Some(item) = first_duplicate(self.items.iter().map(|item| &item.id)) {
            return Err(LessonError::DuplicateItem {
                screen: screen.clone(),
                item: item.clone(),
            });
        }
        if let Some(item) = self
            .items
            .iter()
            .find(|item| self.category(&item.correct_category).is_none())
        {
            return Err(LessonError::UnknownCategory {
                screen: screen.clone(),
                item: item.id.clone(),
            });
        }
        Ok(())
    }
}

//
// ─── SCAVENGER ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScavengerScreen {
    pub title: String,
    pub instructions: String,
    pub min_items_to_complete: usize,
    pub items: Vec<ScavengerItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScavengerItem {
    pub id: ItemId,
    pub prompt: String,
    pub hint: String,
    #[serde(default)]
    pub example_answers: Vec<String>,
}

impl ScavengerScreen {
    fn validate(&self, screen: &ScreenId) -> Result<(), LessonError> {
        if let Some(item) = first_duplicate(self.items.iter().map(|item| &item.id)) {
            return Err(LessonError::DuplicateItem {
                screen: screen.clone(),
                item: item.clone(),
            });
        }
        if self.min_items_to_complete > self.items.len() {
            return Err(LessonError::UnreachableScavengerMinimum {
                screen: screen.clone(),
                min: self.min_items_to_complete,
                items: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Items are tracked by id during play, so ids must be unique per screen.
fn first_duplicate<'a>(mut ids: impl Iterator<Item = &'a ItemId>) -> Option<&'a ItemId> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

//
// ─── FREE-FORM SCREENS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionScreen {
    pub title: String,
    #[serde(default)]
    pub mascot_message: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrationScreen {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub xp_earned: Option<u32>,
    #[serde(default)]
    pub badge_earned: Option<String>,
    #[serde(default)]
    pub next_lesson_id: Option<LessonId>,
    #[serde(default)]
    pub is_module_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionScreen {
    pub title: String,
    #[serde(default)]
    pub intro: Option<String>,
    pub questions: Vec<String>,
    #[serde(default)]
    pub think_about: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuizOption {
        QuizOption {
            text: text.into(),
            is_correct,
            feedback: String::new(),
        }
    }

    #[test]
    fn gated_kinds_are_quiz_sorting_scavenger() {
        let reflection = ScreenKind::Reflection(ReflectionScreen {
            title: "t".into(),
            mascot_message: None,
            prompt: "p".into(),
            placeholder: None,
        });
        assert!(!reflection.is_gated());
        assert!(!ScreenKind::Content(ContentScreen::default()).is_gated());
        assert!(
            !ScreenKind::Unsupported {
                kind: "video".into()
            }
            .is_gated()
        );

        let quiz = ScreenKind::Quiz(QuizScreen {
            title: None,
            intro: None,
            questions: vec![],
        });
        assert!(quiz.is_gated());
        assert_eq!(quiz.tag(), "quiz");
    }

    #[test]
    fn quiz_requires_exactly_one_correct_option() {
        let quiz = QuizScreen {
            title: None,
            intro: None,
            questions: vec![QuizQuestion {
                id: "q1".into(),
                question: "?".into(),
                options: vec![option("a", true), option("b", true)],
                explanation: None,
            }],
        };
        let err = quiz.validate(&"s".into()).unwrap_err();
        assert!(matches!(err, LessonError::InvalidQuestion { .. }));
    }

    #[test]
    fn sorting_rejects_unknown_category() {
        let sorting = SortingScreen {
            title: "t".into(),
            instructions: "i".into(),
            categories: vec![SortCategory {
                id: "ai".into(),
                label: "AI".into(),
                color: "#000".into(),
            }],
            items: vec![SortItem {
                id: "toaster".into(),
                content: "A toaster".into(),
                correct_category: "kitchen".into(),
                explanation: String::new(),
            }],
        };
        let err = sorting.validate(&"s".into()).unwrap_err();
        assert!(matches!(err, LessonError::UnknownCategory { item, .. } if item.as_str() == "toaster"));
    }

    #[test]
    fn sorting_rejects_duplicate_item_ids() {
        let item = |category: &str| SortItem {
            id: "x".into(),
            content: "X".into(),
            correct_category: category.into(),
            explanation: String::new(),
        };
        let category = |id: &str| SortCategory {
            id: id.into(),
            label: id.to_uppercase(),
            color: "#000".into(),
        };
        let sorting = SortingScreen {
            title: "t".into(),
            instructions: "i".into(),
            categories: vec![category("a"), category("b")],
            items: vec![item("a"), item("b")],
        };
        let err = sorting.validate(&"s".into()).unwrap_err();
        assert!(matches!(err, LessonError::DuplicateItem { ref item, .. } if item.as_str() == "x"));
    }

    #[test]
    fn scavenger_rejects_duplicate_item_ids() {
        let item = |prompt: &str| ScavengerItem {
            id: "light".into(),
            prompt: prompt.into(),
            hint: String::new(),
            example_answers: Vec::new(),
        };
        let hunt = ScavengerScreen {
            title: "t".into(),
            instructions: "i".into(),
            min_items_to_complete: 2,
            items: vec![item("lamp"), item("porch light")],
        };
        let err = hunt.validate(&"s".into()).unwrap_err();
        assert!(matches!(err, LessonError::DuplicateItem { .. }));
    }

    #[test]
    fn visual_deserializes_adjacently_tagged() {
        let json = r#"{"type":"grid","data":{"images":["a","b"],"result":"cat"}}"#;
        let visual: Visual = serde_json::from_str(json).unwrap();
        assert!(matches!(visual, Visual::Grid { ref result, .. } if result == "cat"));
    }
}
