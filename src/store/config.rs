use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What `start` does when a connection is already in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedundantStart {
    /// Keep the existing pending connection; the new request is dropped.
    #[default]
    Ignore,
    /// Discard the existing pending connection and start over from the new origin.
    Replace,
    /// Refuse with `StoreError::AlreadyConnecting`.
    Error,
}

/// How fresh connection ids are produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdStrategy {
    /// `conn-<uuid v4>`.
    #[default]
    Uuid,
    /// `<prefix><n>` with a counter that never goes backwards.
    Sequential { prefix: String },
}

/// Tunables of a [`ConnectionStore`](super::ConnectionStore).
///
/// Every field has a default, so an empty JSON object is a valid configuration:
///
/// ```json
/// { "redundant_start": "replace", "id_strategy": { "type": "sequential", "prefix": "e" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub redundant_start: RedundantStart,
    pub id_strategy: IdStrategy,
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}
