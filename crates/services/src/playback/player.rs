use std::sync::Arc;

use lesson_core::model::{ChildId, LessonCompletion};

use super::session::{AdvanceOutcome, PlaybackSession};
use crate::outbox::ProgressOutbox;
use crate::progress::ProgressService;
use crate::screens::{Feedback, ScreenInput, ScreenView};

/// Invoked once with the lesson's reward when the learner passes the last screen.
pub type CompletionCallback = Box<dyn FnOnce(&LessonCompletion) + Send>;

/// Drives a `PlaybackSession` for one learner and reports progress in the background.
pub struct LessonPlayer {
    session: PlaybackSession,
    child_id: ChildId,
    progress: Arc<ProgressService>,
    outbox: Arc<ProgressOutbox>,
    on_complete: Option<CompletionCallback>,
}

impl LessonPlayer {
    /// Start playing and record the lesson as in progress.
    #[must_use]
    pub fn open(
        session: PlaybackSession,
        child_id: ChildId,
        progress: Arc<ProgressService>,
        outbox: Arc<ProgressOutbox>,
    ) -> Self {
        let player = Self {
            session,
            child_id,
            progress,
            outbox,
            on_complete: None,
        };
        player.submit_entered();
        tracing::info!(
            child = %child_id,
            lesson = %player.session.lesson().id(),
            screens = player.session.screen_count(),
            "lesson opened"
        );
        player
    }

    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce(&LessonCompletion) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[must_use]
    pub fn child_id(&self) -> ChildId {
        self.child_id
    }

    #[must_use]
    pub fn view(&self) -> Option<ScreenView> {
        self.session.view()
    }

    pub fn apply(&mut self, input: ScreenInput) -> Feedback {
        self.session.apply(input)
    }

    /// Advance past the current screen. On the last screen this queues the
    /// completion write and fires the completion callback.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.session.advance();
        if let AdvanceOutcome::Finished(completion) = &outcome {
            self.submit_completion(completion.clone());
            if let Some(callback) = self.on_complete.take() {
                callback(completion);
            }
        }
        outcome
    }

    fn submit_entered(&self) {
        let progress = Arc::clone(&self.progress);
        let child_id = self.child_id;
        let lesson_id = self.session.lesson().id().clone();
        let module_id = self.session.lesson().module_id().clone();
        self.outbox.submit("record_screen_entered", async move {
            progress
                .record_screen_entered(child_id, &lesson_id, &module_id)
                .await
        });
    }

    fn submit_completion(&self, completion: LessonCompletion) {
        let progress = Arc::clone(&self.progress);
        let child_id = self.child_id;
        self.outbox.submit("record_completion", async move {
            progress
                .record_completion(child_id, &completion)
                .await
                .map(|_| ())
        });
    }
}
