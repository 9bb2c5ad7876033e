use std::env;

use lesson_core::model::ChildId;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_DB_URL: &str = "sqlite://spark.sqlite3";

/// Connection details for the hosted progress backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Always ends with `/` so table paths can be joined onto it.
    pub base_url: Url,
    pub api_key: String,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if `raw_url` is not an absolute http(s) url.
    pub fn parse(raw_url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        const VAR: &str = "SPARK_BACKEND_URL";
        let mut base_url = Url::parse(raw_url.trim())
            .map_err(|source| ConfigError::InvalidUrl { var: VAR, source })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                var: VAR,
                value: raw_url.to_owned(),
            });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
        })
    }
}

/// Where progress goes and whose progress it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub db_url: String,
    /// When set, progress goes to the hosted backend instead of `SQLite`.
    pub backend: Option<BackendConfig>,
    pub child_id: Option<ChildId>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_owned(),
            backend: None,
            child_id: None,
        }
    }
}

impl SinkConfig {
    /// Read `SPARK_DB_URL`, `SPARK_BACKEND_URL`, `SPARK_BACKEND_KEY` and `SPARK_CHILD_ID`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_url = non_blank("SPARK_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_owned());

        let backend = match non_blank("SPARK_BACKEND_URL") {
            Some(url) => {
                let key = non_blank("SPARK_BACKEND_KEY").ok_or(ConfigError::MissingBackendKey)?;
                Some(BackendConfig::parse(&url, key)?)
            }
            None => None,
        };

        let child_id = non_blank("SPARK_CHILD_ID")
            .map(|raw| {
                raw.parse::<ChildId>()
                    .map_err(|_| ConfigError::InvalidChildId(raw))
            })
            .transpose()?;

        Ok(Self {
            db_url,
            backend,
            child_id,
        })
    }
}
