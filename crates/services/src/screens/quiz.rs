use lesson_core::model::QuizScreen;

use super::{Feedback, ScreenInput, ScreenInteraction};

/// Result of answering one quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question: usize,
    pub selected: usize,
    pub correct: bool,
    /// The chosen option's feedback text.
    pub message: String,
    /// Revealed so a wrong answer can highlight the right one.
    pub correct_option: usize,
    pub explanation: Option<String>,
}

/// Selections for a quiz screen. The first selection per question is final.
#[derive(Debug, Clone)]
pub struct QuizState {
    screen: QuizScreen,
    selections: Vec<Option<usize>>,
}

impl QuizState {
    #[must_use]
    pub fn new(screen: QuizScreen) -> Self {
        let selections = vec![None; screen.questions.len()];
        Self { screen, selections }
    }

    #[must_use]
    pub fn screen(&self) -> &QuizScreen {
        &self.screen
    }

    #[must_use]
    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).copied().flatten()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.screen
            .questions
            .iter()
            .zip(&self.selections)
            .filter(|(q, sel)| sel.is_some_and(|i| q.options.get(i).is_some_and(|o| o.is_correct)))
            .count()
    }

    /// Feedback for an already recorded answer, used when re-rendering.
    #[must_use]
    pub fn answer_feedback(&self, question: usize) -> Option<AnswerFeedback> {
        let selected = self.selection(question)?;
        let q = self.screen.questions.get(question)?;
        let option = q.options.get(selected)?;
        Some(AnswerFeedback {
            question,
            selected,
            correct: option.is_correct,
            message: option.feedback.clone(),
            correct_option: q.correct_index().unwrap_or(selected),
            explanation: q.explanation.clone(),
        })
    }
}

impl ScreenInteraction for QuizState {
    fn is_satisfied(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    fn apply(&mut self, input: ScreenInput) -> Feedback {
        let ScreenInput::SelectOption { question, option } = input else {
            return Feedback::Ignored;
        };
        let Some(q) = self.screen.questions.get(question) else {
            return Feedback::Ignored;
        };
        if option >= q.options.len() {
            return Feedback::Ignored;
        }
        if self.selections[question].is_some() {
            return Feedback::AlreadyAnswered { question };
        }

        self.selections[question] = Some(option);
        self.answer_feedback(question)
            .map_or(Feedback::Ignored, Feedback::Answer)
    }
}
