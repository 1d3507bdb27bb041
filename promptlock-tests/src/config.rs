//! Test config types

use crate::{error::PromptLockTestError, Cli};
use promptlock_access_server::config::ConfigFile as AccessServerConfigFile;
use promptlock_client::Config as ClientConfig;
use promptlock_memory::Config as StorageConfig;
use promptlock_settlement::ProgramConfig;
use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub client_config: ClientConfig,
    pub access_server_config: AccessServerConfigFile,
    pub program_config: ProgramConfig,
    pub storage_config: StorageConfig,
    pub filters: TestFilters,
}

impl TryFrom<Cli> for Config {
    type Error = PromptLockTestError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let access_server_config = std::fs::read_to_string(&cli.access_server_config)?;
        Ok(Self {
            client_config: ClientConfig::from_file(&cli.client_config)?,
            access_server_config: AccessServerConfigFile::from_str(&access_server_config)?,
            program_config: ProgramConfig::from_file(&cli.program_config)?,
            storage_config: StorageConfig::from_file(&cli.storage_config)?,
            filters: cli.filters.unwrap_or_default().into(),
        })
    }
}

/// Settings used when the suites run under `cargo test`, where no config
/// files are passed in.
impl Default for Config {
    fn default() -> Self {
        let mut client_config = ClientConfig::default();
        client_config.retry.initial_backoff = Duration::from_millis(10);

        Self {
            client_config,
            access_server_config: AccessServerConfigFile {
                service_key: None,
                program_id: promptlock::constants::PROGRAM_ID,
                max_auth_proof_age: Duration::from_secs(60),
                logging: Default::default(),
            },
            program_config: ProgramConfig::default(),
            storage_config: StorageConfig::default(),
            filters: TestFilters::default(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TestFilters {
    filters: Vec<String>,
}

impl From<Vec<String>> for TestFilters {
    fn from(filters: Vec<String>) -> Self {
        Self { filters }
    }
}

impl TestFilters {
    pub fn matches(&self, text: &str) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        self.filters
            .iter()
            .any(|filter| text.to_lowercase().contains(&filter.to_lowercase()))
    }
}
