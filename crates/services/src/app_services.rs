use std::sync::Arc;

use lesson_core::LessonCatalog;
use lesson_core::model::{ChildId, Lesson, LessonId};
use storage::repository::Storage;

use crate::Clock;
use crate::backend::HostedProgressStore;
use crate::config::{BackendConfig, SinkConfig};
use crate::error::{AppServicesError, LessonLookupError};
use crate::outbox::ProgressOutbox;
use crate::playback::{LessonPlayer, PlaybackSession};
use crate::progress::ProgressService;

/// Assembles the lesson catalog, the progress sink and the background writer.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    catalog: Arc<LessonCatalog>,
    progress: Arc<ProgressService>,
    outbox: Arc<ProgressOutbox>,
}

impl AppServices {
    /// Build services over an already-opened storage backend.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if there is no runtime to run progress writes on.
    pub fn with_storage(
        storage: &Storage,
        catalog: LessonCatalog,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(catalog);
        let progress = Arc::new(ProgressService::from_storage(
            clock,
            Arc::clone(&catalog),
            storage,
        ));
        let outbox = Arc::new(ProgressOutbox::current()?);
        Ok(Self {
            clock,
            catalog,
            progress,
            outbox,
        })
    }

    /// Built-in lessons with progress kept in memory.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in catalog is invalid or no runtime is running.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::with_storage(&Storage::in_memory(), LessonCatalog::builtin()?, clock)
    }

    /// Built-in lessons with progress in a local `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(&storage, LessonCatalog::builtin()?, clock)
    }

    /// Built-in lessons with progress posted to the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in catalog is invalid or no runtime is running.
    pub fn hosted(config: &BackendConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::from_backend(HostedProgressStore::new(config.clone()));
        Self::with_storage(&storage, LessonCatalog::builtin()?, clock)
    }

    /// Pick the hosted backend when configured, `SQLite` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the chosen backend cannot be initialized.
    pub async fn from_config(config: &SinkConfig, clock: Clock) -> Result<Self, AppServicesError> {
        match &config.backend {
            Some(backend) => {
                tracing::info!(url = %backend.base_url, "using hosted progress backend");
                Self::hosted(backend, clock)
            }
            None => {
                tracing::info!(db = %config.db_url, "using sqlite progress store");
                Self::new_sqlite(&config.db_url, clock).await
            }
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<LessonCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn outbox(&self) -> Arc<ProgressOutbox> {
        Arc::clone(&self.outbox)
    }

    /// # Errors
    ///
    /// Returns `LessonLookupError::NotFound` for ids missing from the catalog.
    pub fn lesson(&self, id: &LessonId) -> Result<&Lesson, LessonLookupError> {
        self.catalog
            .get(id)
            .ok_or_else(|| LessonLookupError::NotFound(id.clone()))
    }

    /// Open a lesson for `child_id` and start reporting its progress.
    ///
    /// # Errors
    ///
    /// Returns `LessonLookupError::NotFound` for ids missing from the catalog.
    pub fn start_lesson(
        &self,
        id: &LessonId,
        child_id: ChildId,
    ) -> Result<LessonPlayer, LessonLookupError> {
        let lesson = self.lesson(id)?.clone();
        let session = PlaybackSession::new(lesson, self.clock);
        Ok(LessonPlayer::open(
            session,
            child_id,
            self.progress(),
            self.outbox(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::LessonStatus;
    use lesson_core::time::fixed_clock;

    #[tokio::test]
    async fn unknown_lesson_is_reported() {
        let services = AppServices::in_memory(fixed_clock()).unwrap();
        let err = services
            .start_lesson(&LessonId::new("lesson-9-9"), ChildId::random())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Lesson not found: lesson-9-9");
    }

    #[tokio::test]
    async fn opening_a_lesson_marks_it_in_progress() {
        let services = AppServices::in_memory(fixed_clock()).unwrap();
        let child = ChildId::random();
        let id = LessonId::new("lesson-1-1");

        let player = services.start_lesson(&id, child).unwrap();
        assert_eq!(player.session().current_index(), 0);
        services.outbox().flush().await.unwrap();

        let record = services
            .progress()
            .progress_for_lesson(child, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, LessonStatus::InProgress);
    }

    #[test]
    fn in_memory_needs_a_runtime() {
        let err = AppServices::in_memory(fixed_clock()).err().unwrap();
        assert!(matches!(err, AppServicesError::Outbox(_)));
    }
}
