use chrono::{DateTime, Utc};
use lesson_core::model::{Lesson, LessonCompletion, Screen, percentage_score};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Clock;
use crate::screens::{Feedback, ScreenInput, ScreenInteraction, ScreenState, ScreenView, render};

/// Result of asking the session to move past the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The current screen's completion predicate does not hold yet.
    Blocked,
    /// Moved to the screen at `index`.
    Advanced { index: usize },
    /// Passed the last screen; carries the one and only reward for this session.
    Finished(LessonCompletion),
    /// The lesson already finished; no second reward.
    AlreadyFinished,
}

/// Transient, strictly forward playback of one lesson.
///
/// Created when a lesson is opened and discarded when the learner leaves.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    lesson: Lesson,
    clock: Clock,
    started_at: DateTime<Utc>,
    index: usize,
    completed: Vec<bool>,
    state: ScreenState,
    rng: StdRng,
    quiz_correct: usize,
    quiz_total: usize,
    finished: bool,
}

impl PlaybackSession {
    #[must_use]
    pub fn new(lesson: Lesson, clock: Clock) -> Self {
        Self::with_rng(lesson, clock, StdRng::seed_from_u64(rand::random()))
    }

    /// Deterministic shuffling for tests and replays.
    #[must_use]
    pub fn with_seed(lesson: Lesson, clock: Clock, seed: u64) -> Self {
        Self::with_rng(lesson, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lesson: Lesson, clock: Clock, mut rng: StdRng) -> Self {
        let count = lesson.screen_count();
        let state = lesson
            .screen(0)
            .map_or(ScreenState::Passive, |s| ScreenState::for_screen(s.kind(), &mut rng));
        let mut completed = vec![false; count];
        if let Some(first) = completed.first_mut() {
            *first = state.is_satisfied();
        }
        Self {
            started_at: clock.now(),
            lesson,
            clock,
            index: 0,
            completed,
            state,
            rng,
            quiz_correct: 0,
            quiz_total: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.lesson.screen_count()
    }

    #[must_use]
    pub fn current_screen(&self) -> Option<&Screen> {
        self.lesson.screen(self.index)
    }

    #[must_use]
    pub fn is_last_screen(&self) -> bool {
        self.index + 1 >= self.screen_count()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_current_complete(&self) -> bool {
        self.completed.get(self.index).copied().unwrap_or(true)
    }

    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Fraction of screens passed, for progress bars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        let count = self.screen_count().max(1);
        let passed = if self.finished { count } else { self.index };
        passed as f32 / count as f32
    }

    /// Flag the active screen as done. Idempotent.
    pub fn mark_current_complete(&mut self) {
        if let Some(flag) = self.completed.get_mut(self.index) {
            *flag = true;
        }
    }

    /// Route learner input to the active screen.
    ///
    /// Completion is sticky: once the predicate has held, later edits cannot
    /// re-lock the screen.
    pub fn apply(&mut self, input: ScreenInput) -> Feedback {
        if self.finished {
            return Feedback::Ignored;
        }
        let feedback = self.state.apply(input);
        if self.state.is_satisfied() {
            self.mark_current_complete();
        }
        feedback
    }

    #[must_use]
    pub fn view(&self) -> Option<ScreenView> {
        self.current_screen()
            .map(|screen| render(screen, &self.state, self.is_last_screen()))
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.finished {
            return AdvanceOutcome::AlreadyFinished;
        }
        if !self.is_current_complete() {
            return AdvanceOutcome::Blocked;
        }

        if let Some(quiz) = self.state.as_quiz() {
            self.quiz_correct += quiz.correct_count();
            self.quiz_total += quiz.question_count();
        }

        let next = self.index + 1;
        match self.lesson.screen(next) {
            Some(screen) => {
                self.state = ScreenState::for_screen(screen.kind(), &mut self.rng);
                self.index = next;
                if self.state.is_satisfied() {
                    self.mark_current_complete();
                }
                AdvanceOutcome::Advanced { index: next }
            }
            None => {
                self.finished = true;
                AdvanceOutcome::Finished(self.completion())
            }
        }
    }

    fn completion(&self) -> LessonCompletion {
        LessonCompletion {
            lesson_id: self.lesson.id().clone(),
            module_id: self.lesson.module_id().clone(),
            xp_awarded: self.lesson.xp_reward(),
            badge: self.lesson.badge_id().cloned(),
            score: percentage_score(self.quiz_correct, self.quiz_total),
            had_quiz: self.quiz_total > 0,
            time_spent_seconds: self.clock.seconds_since(self.started_at),
            completed_at: self.clock.now(),
        }
    }
}
