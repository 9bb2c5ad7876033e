use lesson_core::model::{
    CategoryId, CelebrationScreen, ContentScreen, DiscussionScreen, ItemId, MascotExpression,
    ReflectionScreen, Screen, ScreenId, ScreenKind, Visual,
};

use super::text::{TextSpan, parse_bold};
use super::{QuizState, ScavengerState, ScreenInteraction, ScreenState, SortingState};

const CONTINUE: &str = "Continue";
const FINISH_LESSON: &str = "Finish Lesson";

/// Presentation-agnostic rendering of one screen.
///
/// Carries everything a front end needs to draw the screen; no layout or
/// styling decisions are made here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub screen_id: ScreenId,
    pub mascot: Option<MascotExpression>,
    pub body: ScreenBody,
    pub button: ButtonView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub enabled: bool,
}

impl ButtonView {
    fn enabled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
        }
    }

    fn gated(satisfied: bool, waiting_label: String) -> Self {
        if satisfied {
            Self::enabled(CONTINUE)
        } else {
            Self {
                label: waiting_label,
                enabled: false,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenBody {
    Content(ContentView),
    Quiz(QuizView),
    Sorting(SortingView),
    Scavenger(ScavengerView),
    Reflection(ReflectionView),
    Celebration(CelebrationView),
    Discussion(DiscussionView),
    /// Placeholder for a screen type this build cannot play.
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    pub title: Option<String>,
    pub mascot_message: Option<String>,
    pub body: Option<Vec<TextSpan>>,
    pub bullet_points: Vec<Vec<TextSpan>>,
    pub visual: Option<Visual>,
    pub tip: Option<Vec<TextSpan>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Not yet answered.
    Open,
    ChosenCorrect,
    ChosenWrong,
    /// The right answer, revealed after a wrong pick.
    Revealed,
    /// Answered elsewhere; nothing to show on this option.
    Dimmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub feedback: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub title: Option<String>,
    pub intro: Option<String>,
    pub questions: Vec<QuestionView>,
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItemView {
    pub id: ItemId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub id: CategoryId,
    pub label: String,
    pub color: String,
    pub placed: Vec<SortItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingView {
    pub title: String,
    pub instructions: String,
    pub categories: Vec<CategoryView>,
    pub remaining: Vec<SortItemView>,
    /// "Perfect!" or "Great Job!" once everything is sorted.
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingView {
    pub id: ItemId,
    pub prompt: String,
    pub hint: String,
    pub finding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScavengerView {
    pub title: String,
    pub instructions: String,
    pub items: Vec<FindingView>,
    /// "Found: n / m required".
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionView {
    pub title: String,
    pub mascot_message: Option<String>,
    pub prompt: String,
    pub placeholder: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CelebrationView {
    pub title: String,
    pub message: String,
    pub achievements: Vec<String>,
    pub xp_earned: Option<u32>,
    pub badge_earned: Option<String>,
    pub is_module_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionView {
    pub title: String,
    pub intro: Option<String>,
    pub questions: Vec<String>,
    pub think_about: Option<String>,
}

/// Render `screen` with its interaction `state`.
///
/// `is_last` selects the closing button label on celebration and discussion screens.
#[must_use]
pub fn render(screen: &Screen, state: &ScreenState, is_last: bool) -> ScreenView {
    let closing = if is_last { FINISH_LESSON } else { CONTINUE };

    let (body, button) = match (screen.kind(), state) {
        (ScreenKind::Quiz(_), ScreenState::Quiz(quiz)) => render_quiz(quiz),
        (ScreenKind::Sorting(_), ScreenState::Sorting(sorting)) => render_sorting(sorting),
        (ScreenKind::Scavenger(_), ScreenState::Scavenger(hunt)) => render_scavenger(hunt),
        (ScreenKind::Reflection(data), ScreenState::Reflection(reflection)) => (
            ScreenBody::Reflection(reflection_view(data, reflection.response())),
            ButtonView::enabled(CONTINUE),
        ),
        (ScreenKind::Reflection(data), _) => (
            ScreenBody::Reflection(reflection_view(data, "")),
            ButtonView::enabled(CONTINUE),
        ),
        (ScreenKind::Content(data), _) => (
            ScreenBody::Content(content_view(data)),
            ButtonView::enabled(data.button_text.as_deref().unwrap_or(CONTINUE)),
        ),
        (ScreenKind::Celebration(data), _) => (
            ScreenBody::Celebration(celebration_view(data)),
            ButtonView::enabled(closing),
        ),
        (ScreenKind::Discussion(data), _) => (
            ScreenBody::Discussion(discussion_view(data)),
            ButtonView::enabled(closing),
        ),
        (ScreenKind::Unsupported { kind }, _) => (
            ScreenBody::Unsupported { kind: kind.clone() },
            ButtonView::enabled(CONTINUE),
        ),
        // Gated screen paired with a foreign state: show it as unsupported so the
        // learner is never stuck.
        (other, _) => (
            ScreenBody::Unsupported {
                kind: other.tag().to_owned(),
            },
            ButtonView::enabled(CONTINUE),
        ),
    };

    ScreenView {
        screen_id: screen.id().clone(),
        mascot: screen.mascot(),
        body,
        button,
    }
}

fn content_view(data: &ContentScreen) -> ContentView {
    ContentView {
        title: data.title.clone(),
        mascot_message: data.mascot_message.clone(),
        body: data.body.as_deref().map(parse_bold),
        bullet_points: data.bullet_points.iter().map(|b| parse_bold(b)).collect(),
        visual: data.visual.clone(),
        tip: data.tip.as_deref().map(parse_bold),
    }
}

fn render_quiz(quiz: &QuizState) -> (ScreenBody, ButtonView) {
    let screen = quiz.screen();
    let questions = screen
        .questions
        .iter()
        .enumerate()
        .map(|(qi, question)| {
            let answer = quiz.answer_feedback(qi);
            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(oi, option)| OptionView {
                    text: option.text.clone(),
                    mark: match &answer {
                        None => OptionMark::Open,
                        Some(a) if a.selected == oi && a.correct => OptionMark::ChosenCorrect,
                        Some(a) if a.selected == oi => OptionMark::ChosenWrong,
                        Some(a) if a.correct_option == oi => OptionMark::Revealed,
                        Some(_) => OptionMark::Dimmed,
                    },
                })
                .collect();
            QuestionView {
                prompt: question.question.clone(),
                options,
                feedback: answer.as_ref().map(|a| a.message.clone()),
                explanation: answer.and_then(|a| a.explanation),
            }
        })
        .collect();

    let remaining = quiz.question_count() - quiz.answered_count();
    let body = ScreenBody::Quiz(QuizView {
        title: screen.title.clone(),
        intro: screen.intro.clone(),
        questions,
        answered: quiz.answered_count(),
        total: quiz.question_count(),
    });
    let waiting = format!("Answer {remaining} more");
    (body, ButtonView::gated(quiz.is_satisfied(), waiting))
}

fn render_sorting(sorting: &SortingState) -> (ScreenBody, ButtonView) {
    let screen = sorting.screen();
    let item_view = |item: &lesson_core::model::SortItem| SortItemView {
        id: item.id.clone(),
        content: item.content.clone(),
    };
    let categories = screen
        .categories
        .iter()
        .map(|c| CategoryView {
            id: c.id.clone(),
            label: c.label.clone(),
            color: c.color.clone(),
            placed: sorting.placed_in(&c.id).map(item_view).collect(),
        })
        .collect();

    let done = sorting.is_satisfied();
    let result = done.then(|| {
        if sorting.all_correct_first_try() {
            "Perfect!".to_owned()
        } else {
            "Great Job!".to_owned()
        }
    });
    let body = ScreenBody::Sorting(SortingView {
        title: screen.title.clone(),
        instructions: screen.instructions.clone(),
        categories,
        remaining: sorting.remaining().map(item_view).collect(),
        result,
    });
    let waiting = format!("Sort {} more", screen.items.len() - sorting.placed_count());
    (body, ButtonView::gated(done, waiting))
}

fn render_scavenger(hunt: &ScavengerState) -> (ScreenBody, ButtonView) {
    let screen = hunt.screen();
    let items = screen
        .items
        .iter()
        .map(|item| FindingView {
            id: item.id.clone(),
            prompt: item.prompt.clone(),
            hint: item.hint.clone(),
            finding: hunt.finding(&item.id).map(str::to_owned),
        })
        .collect();
    let body = ScreenBody::Scavenger(ScavengerView {
        title: screen.title.clone(),
        instructions: screen.instructions.clone(),
        items,
        status: format!("Found: {} / {} required", hunt.found_count(), hunt.required()),
    });
    let waiting = format!("Find {} more", hunt.still_needed());
    (body, ButtonView::gated(hunt.is_satisfied(), waiting))
}

fn reflection_view(data: &ReflectionScreen, response: &str) -> ReflectionView {
    ReflectionView {
        title: data.title.clone(),
        mascot_message: data.mascot_message.clone(),
        prompt: data.prompt.clone(),
        placeholder: data
            .placeholder
            .clone()
            .unwrap_or_else(|| "Share your thoughts...".to_owned()),
        response: response.to_owned(),
    }
}

fn celebration_view(data: &CelebrationScreen) -> CelebrationView {
    CelebrationView {
        title: data.title.clone(),
        message: data.message.clone(),
        achievements: data.achievements.clone(),
        xp_earned: data.xp_earned,
        badge_earned: data.badge_earned.clone(),
        is_module_complete: data.is_module_complete,
    }
}

fn discussion_view(data: &DiscussionScreen) -> DiscussionView {
    DiscussionView {
        title: data.title.clone(),
        intro: data.intro.clone(),
        questions: data.questions.clone(),
        think_about: data.think_about.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ScreenInput;
    use lesson_core::model::{ScavengerItem, ScavengerScreen};

    fn celebration() -> Screen {
        Screen::new(
            "done",
            ScreenKind::Celebration(CelebrationScreen {
                title: "Yay".into(),
                message: "Done".into(),
                achievements: Vec::new(),
                xp_earned: Some(50),
                badge_earned: None,
                next_lesson_id: None,
                is_module_complete: false,
            }),
        )
    }

    #[test]
    fn closing_label_depends_on_position() {
        let screen = celebration();
        assert_eq!(render(&screen, &ScreenState::Passive, true).button.label, "Finish Lesson");
        assert_eq!(render(&screen, &ScreenState::Passive, false).button.label, "Continue");
    }

    #[test]
    fn content_uses_authored_button_text_and_bold_markup() {
        let screen = Screen::new(
            "intro",
            ScreenKind::Content(ContentScreen {
                bullet_points: vec!["**AI** is a tool".into()],
                button_text: Some("Let's go!".into()),
                ..ContentScreen::default()
            }),
        );
        let view = render(&screen, &ScreenState::Passive, false);
        assert_eq!(view.button, ButtonView::enabled("Let's go!"));
        let ScreenBody::Content(content) = view.body else {
            panic!("expected content body");
        };
        assert!(content.bullet_points[0][0].bold);
        assert_eq!(content.bullet_points[0][0].text, "AI");
    }

    #[test]
    fn scavenger_shows_found_count_and_remaining() {
        let hunt = ScavengerScreen {
            title: "Hunt".into(),
            instructions: "Find".into(),
            min_items_to_complete: 2,
            items: vec![ScavengerItem {
                id: "voice".into(),
                prompt: "Talk".into(),
                hint: "Alexa?".into(),
                example_answers: Vec::new(),
            }],
        };
        let screen = Screen::new("hunt", ScreenKind::Scavenger(hunt.clone()));
        let mut state = ScreenState::Scavenger(ScavengerState::new(hunt));
        state.apply(ScreenInput::RecordFinding {
            item: "voice".into(),
            text: "Alexa".into(),
        });

        let view = render(&screen, &state, false);
        assert_eq!(
            view.button,
            ButtonView {
                label: "Find 1 more".into(),
                enabled: false
            }
        );
        let ScreenBody::Scavenger(body) = view.body else {
            panic!("expected scavenger body");
        };
        assert_eq!(body.status, "Found: 1 / 2 required");
        assert_eq!(body.items[0].finding.as_deref(), Some("Alexa"));
    }

    #[test]
    fn unsupported_screen_renders_placeholder() {
        let screen = Screen::new(
            "clip",
            ScreenKind::Unsupported {
                kind: "video".into(),
            },
        );
        let view = render(&screen, &ScreenState::Passive, false);
        assert_eq!(
            view.body,
            ScreenBody::Unsupported {
                kind: "video".into()
            }
        );
        assert!(view.button.enabled);
    }
}
