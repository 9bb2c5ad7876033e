#![forbid(unsafe_code)]

pub mod app_services;
pub mod backend;
pub mod config;
pub mod error;
pub mod outbox;
pub mod playback;
pub mod progress;
pub mod screens;

pub use lesson_core::Clock;

pub use app_services::AppServices;
pub use backend::HostedProgressStore;
pub use config::{BackendConfig, SinkConfig};
pub use error::{
    AppServicesError, BackendError, ConfigError, LessonLookupError, OutboxError, ProgressError,
};
pub use outbox::ProgressOutbox;
pub use playback::{AdvanceOutcome, CompletionCallback, LessonPlayer, PlaybackSession};
pub use progress::{CompletionOutcome, ProgressService, ProgressSummary};
pub use screens::{Feedback, ScreenInput, ScreenState, ScreenView};
