//! Per-screen interaction state and presentation-agnostic views.
//!
//! Every screen type gets a state object that accepts learner input and reports
//! whether the screen's completion predicate holds. Rendering is a pure function
//! of the screen, its state and whether it is the lesson's last screen.

mod quiz;
mod scavenger;
mod sorting;
mod text;
mod view;

use lesson_core::model::{CategoryId, ItemId, ScreenKind};
use rand::Rng;

pub use quiz::{AnswerFeedback, QuizState};
pub use scavenger::ScavengerState;
pub use sorting::SortingState;
pub use text::{TextSpan, parse_bold};
pub use view::{
    ButtonView, CategoryView, CelebrationView, ContentView, DiscussionView, FindingView,
    OptionMark, OptionView, QuestionView, QuizView, ReflectionView, ScavengerView, ScreenBody,
    ScreenView, SortItemView, SortingView, render,
};

/// Learner input routed to the active screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenInput {
    /// Pick an option for one quiz question (both 0-based).
    SelectOption { question: usize, option: usize },
    /// Tap an item, then a category.
    Place { item: ItemId, category: CategoryId },
    /// Write what was found for a scavenger item; blank text clears it.
    RecordFinding { item: ItemId, text: String },
    Reflect(String),
}

/// Immediate response to a `ScreenInput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// The input does not apply to the active screen.
    Ignored,
    Answer(AnswerFeedback),
    AlreadyAnswered { question: usize },
    Placed { item: ItemId, explanation: String },
    /// Wrong category; the item stays unplaced.
    Misplaced { item: ItemId, explanation: String },
    FindingRecorded { found: usize, required: usize },
    ReflectionSaved,
}

/// Contract shared by every screen's interaction state.
pub trait ScreenInteraction {
    /// Whether the completion predicate holds.
    fn is_satisfied(&self) -> bool;

    fn apply(&mut self, input: ScreenInput) -> Feedback;
}

/// Free-text answer to a reflection prompt; never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionState {
    response: String,
}

impl ReflectionState {
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }
}

impl ScreenInteraction for ReflectionState {
    fn is_satisfied(&self) -> bool {
        true
    }

    fn apply(&mut self, input: ScreenInput) -> Feedback {
        match input {
            ScreenInput::Reflect(text) => {
                self.response = text;
                Feedback::ReflectionSaved
            }
            _ => Feedback::Ignored,
        }
    }
}

/// Interaction state of the active screen.
#[derive(Debug, Clone)]
pub enum ScreenState {
    /// Content, celebration, discussion and unsupported screens take no input.
    Passive,
    Quiz(QuizState),
    Sorting(SortingState),
    Scavenger(ScavengerState),
    Reflection(ReflectionState),
}

impl ScreenState {
    /// Fresh state for a screen; `rng` shuffles sorting items.
    pub fn for_screen<R: Rng + ?Sized>(kind: &ScreenKind, rng: &mut R) -> Self {
        match kind {
            ScreenKind::Quiz(quiz) => Self::Quiz(QuizState::new(quiz.clone())),
            ScreenKind::Sorting(sorting) => {
                Self::Sorting(SortingState::shuffled(sorting.clone(), rng))
            }
            ScreenKind::Scavenger(hunt) => Self::Scavenger(ScavengerState::new(hunt.clone())),
            ScreenKind::Reflection(_) => Self::Reflection(ReflectionState::default()),
            ScreenKind::Content(_)
            | ScreenKind::Celebration(_)
            | ScreenKind::Discussion(_)
            | ScreenKind::Unsupported { .. } => Self::Passive,
        }
    }

    #[must_use]
    pub fn as_quiz(&self) -> Option<&QuizState> {
        match self {
            Self::Quiz(quiz) => Some(quiz),
            _ => None,
        }
    }
}

impl ScreenInteraction for ScreenState {
    fn is_satisfied(&self) -> bool {
        match self {
            Self::Passive => true,
            Self::Quiz(s) => s.is_satisfied(),
            Self::Sorting(s) => s.is_satisfied(),
            Self::Scavenger(s) => s.is_satisfied(),
            Self::Reflection(s) => s.is_satisfied(),
        }
    }

    fn apply(&mut self, input: ScreenInput) -> Feedback {
        match self {
            Self::Passive => Feedback::Ignored,
            Self::Quiz(s) => s.apply(input),
            Self::Sorting(s) => s.apply(input),
            Self::Scavenger(s) => s.apply(input),
            Self::Reflection(s) => s.apply(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::ContentScreen;

    #[test]
    fn passive_screens_ignore_input() {
        let mut state =
            ScreenState::for_screen(&ScreenKind::Content(ContentScreen::default()), &mut rand::rng());
        assert!(state.is_satisfied());
        assert_eq!(
            state.apply(ScreenInput::Reflect("hi".into())),
            Feedback::Ignored
        );
    }

    #[test]
    fn reflection_accepts_any_text() {
        let mut state = ReflectionState::default();
        assert!(state.is_satisfied());
        assert_eq!(
            state.apply(ScreenInput::Reflect(String::new())),
            Feedback::ReflectionSaved
        );
        state.apply(ScreenInput::Reflect("robots in cars".into()));
        assert_eq!(state.response(), "robots in cars");
    }
}
