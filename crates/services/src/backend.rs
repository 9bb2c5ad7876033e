//! Progress repositories backed by the hosted REST backend.
//!
//! The backend exposes `lesson_progress`, `achievements` and `streaks` tables
//! under `/rest/v1/` with PostgREST query conventions (`column=eq.value`,
//! upserts via `Prefer: resolution=merge-duplicates`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lesson_core::model::{Achievement, ChildId, LessonId, LessonProgress, Streak};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storage::repository::{
    AchievementRepository, LessonProgressRepository, StorageError, StreakRepository,
};
use url::Url;

use crate::config::BackendConfig;
use crate::error::BackendError;

const PROGRESS: &str = "lesson_progress";
const ACHIEVEMENTS: &str = "achievements";
const STREAKS: &str = "streaks";

#[derive(Clone)]
pub struct HostedProgressStore {
    client: Client,
    config: BackendConfig,
}

/// Wire shape of an `achievements` row.
#[derive(Debug, Serialize, Deserialize)]
struct AchievementRow {
    child_id: ChildId,
    achievement_type: String,
    earned_at: DateTime<Utc>,
}

impl HostedProgressStore {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &str, filters: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self.config.base_url.join("rest/v1/")?.join(table)?;
        if !filters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in filters {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let url = self.table_url(table, filters)?;
        let response = self.authed(self.client.get(url)).send().await?;
        Ok(checked(response)?.json().await?)
    }

    async fn upsert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        on_conflict: &str,
        prefer: &str,
        row: &T,
    ) -> Result<Response, BackendError> {
        let url = self.table_url(table, &[("on_conflict", on_conflict.to_owned())])?;
        let response = self
            .authed(self.client.post(url))
            .header("Prefer", prefer)
            .json(row)
            .send()
            .await?;
        checked(response)
    }
}

fn checked(response: Response) -> Result<Response, BackendError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(BackendError::HttpStatus(response.status()))
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl LessonProgressRepository for HostedProgressStore {
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        self.upsert(
            PROGRESS,
            "child_id,lesson_id",
            "resolution=merge-duplicates,return=minimal",
            progress,
        )
        .await?;
        tracing::debug!(child = %progress.child_id, lesson = %progress.lesson_id, "posted lesson progress");
        Ok(())
    }

    async fn get_progress(
        &self,
        child_id: ChildId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let rows: Vec<LessonProgress> = self
            .select(
                PROGRESS,
                &[
                    ("select", "*".to_owned()),
                    ("child_id", eq(child_id)),
                    ("lesson_id", eq(lesson_id)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_progress(&self, child_id: ChildId) -> Result<Vec<LessonProgress>, StorageError> {
        Ok(self
            .select(
                PROGRESS,
                &[
                    ("select", "*".to_owned()),
                    ("child_id", eq(child_id)),
                    ("order", "lesson_id.asc".to_owned()),
                ],
            )
            .await?)
    }
}

#[async_trait]
impl AchievementRepository for HostedProgressStore {
    async fn insert_achievement(&self, achievement: &Achievement) -> Result<bool, StorageError> {
        let row = AchievementRow {
            child_id: achievement.child_id,
            achievement_type: achievement.kind.to_string(),
            earned_at: achievement.earned_at,
        };
        let inserted: Vec<AchievementRow> = self
            .upsert(
                ACHIEVEMENTS,
                "child_id,achievement_type",
                "resolution=ignore-duplicates,return=representation",
                &row,
            )
            .await?
            .json()
            .await
            .map_err(BackendError::from)?;
        Ok(!inserted.is_empty())
    }

    async fn list_achievements(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<Achievement>, StorageError> {
        let rows: Vec<AchievementRow> = self
            .select(
                ACHIEVEMENTS,
                &[
                    ("select", "*".to_owned()),
                    ("child_id", eq(child_id)),
                    ("order", "earned_at.asc".to_owned()),
                ],
            )
            .await?;
        rows.into_iter()
            .map(|row| {
                let kind = row
                    .achievement_type
                    .parse()
                    .map_err(|e| StorageError::Serialization(format!("{e}")))?;
                Ok(Achievement::new(row.child_id, kind, row.earned_at))
            })
            .collect()
    }
}

#[async_trait]
impl StreakRepository for HostedProgressStore {
    async fn get_streak(&self, child_id: ChildId) -> Result<Option<Streak>, StorageError> {
        let rows: Vec<Streak> = self
            .select(
                STREAKS,
                &[("select", "*".to_owned()), ("child_id", eq(child_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        self.upsert(
            STREAKS,
            "child_id",
            "resolution=merge-duplicates,return=minimal",
            streak,
        )
        .await?;
        Ok(())
    }
}
