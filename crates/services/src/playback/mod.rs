//! Lesson playback: the per-open session state machine and the player that
//! connects it to the progress sink.

mod player;
mod session;

pub use player::{CompletionCallback, LessonPlayer};
pub use session::{AdvanceOutcome, PlaybackSession};
