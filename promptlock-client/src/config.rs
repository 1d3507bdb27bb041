use crate::MarketClientError;
use promptlock::{
    constants::{BUNDLE_CONTENT_TYPE, PROGRAM_ID},
    types::identity::ProgramId,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::{path::Path, str::FromStr, time::Duration};

/// Client configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_program_id")]
    pub program_id: ProgramId,
    /// Limit on each individual call to an external service.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub metadata: MetadataDefaults,
}

fn default_program_id() -> ProgramId {
    PROGRAM_ID
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program_id: PROGRAM_ID,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            metadata: MetadataDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, MarketClientError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| MarketClientError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        Self::from_str(&config_string)
    }
}

impl FromStr for Config {
    type Err = MarketClientError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}

/// Retry policy for transient failures. Backoff doubles after each attempt
/// up to `max_backoff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Values used for bundle metadata fields the seller doesn't supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct MetadataDefaults {
    pub content_type: String,
    pub description: Option<String>,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            content_type: BUNDLE_CONTENT_TYPE.to_string(),
            description: None,
        }
    }
}
