//! Configuration shared by every binary in the workspace.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::path::PathBuf;
use tracing::Level;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoggingConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub stdout_log_level: Level,
    pub log_files: Option<LoggingFileConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout_log_level: Level::INFO,
            log_files: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoggingFileConfig {
    /// Events from the workspace crates, at every level.
    pub promptlock_logs_file_name: PathBuf,
    /// Events from every crate, including dependencies.
    pub all_logs_file_name: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_config_parses() {
        let config_str = r#"
            stdout_log_level = "DEBUG"

            [log_files]
            promptlock_logs_file_name = "./dev/logs/promptlock.log"
            all_logs_file_name = "./dev/logs/all.log"
        "#;

        let config: LoggingConfig = toml::from_str(config_str).unwrap();
        assert_eq!(
            config,
            LoggingConfig {
                stdout_log_level: Level::DEBUG,
                log_files: Some(LoggingFileConfig {
                    promptlock_logs_file_name: "./dev/logs/promptlock.log".into(),
                    all_logs_file_name: "./dev/logs/all.log".into(),
                }),
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let config_str = r#"
            stdout_log_level = "INFO"
            verbose = true
        "#;
        assert!(toml::from_str::<LoggingConfig>(config_str).is_err());
    }
}
