//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::catalog::CatalogError;
use lesson_core::model::LessonId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A lesson id that the catalog does not know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonLookupError {
    #[error("Lesson not found: {0}")]
    NotFound(LessonId),
}

/// Errors emitted by the hosted progress backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<BackendError> for StorageError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::HttpStatus(status) if status == reqwest::StatusCode::CONFLICT => {
                StorageError::Conflict
            }
            BackendError::Http(e) if e.is_decode() => StorageError::Serialization(e.to_string()),
            other => StorageError::Connection(other.to_string()),
        }
    }
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid url: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} must be an http(s) url, got {value}")]
    UnsupportedScheme { var: &'static str, value: String },
    #[error("SPARK_BACKEND_KEY is required when SPARK_BACKEND_URL is set")]
    MissingBackendKey,
    #[error("SPARK_CHILD_ID is not a valid uuid: {0}")]
    InvalidChildId(String),
}

/// Errors emitted by the progress outbox.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutboxError {
    #[error("progress outbox needs a running tokio runtime")]
    NoRuntime,
    #[error("progress outbox worker stopped")]
    Stopped,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Outbox(#[from] OutboxError),
}
