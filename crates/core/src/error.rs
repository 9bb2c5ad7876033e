use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{AchievementParseError, LessonError, ProgressRecordError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    ProgressRecord(#[from] ProgressRecordError),
    #[error(transparent)]
    Achievement(#[from] AchievementParseError),
}
