//! Config for in-memory storage.

use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    /// Largest object [`crate::MemoryStorage`] accepts, in bytes.
    pub max_object_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_object_size: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, Error> {
        let config_string = std::fs::read_to_string(&config_path)?;
        Self::from_str(&config_string)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses() {
        let config = Config::from_str("max_object_size = 1024").unwrap();
        assert_eq!(config.max_object_size, 1024);
        assert!(Config::from_str("max_object_size = 1024\nttl = 3").is_err());
    }
}
