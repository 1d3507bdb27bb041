use crate::AccessServerError;
use promptlock::{
    config::LoggingConfig, constants::PROGRAM_ID, crypto::ServiceKey,
    types::identity::ProgramId,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

/// Server configuration with all fields ready to use
#[derive(Clone, Debug)]
pub struct Config {
    pub service_key: Arc<ServiceKey>,
    pub program_id: ProgramId,
    /// Oldest authentication proof the service accepts.
    pub max_auth_proof_age: Duration,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(
        config_path: impl AsRef<Path>,
        service_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, AccessServerError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| AccessServerError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        let config_file = ConfigFile::from_str(&config_string)?;
        Self::from_config_file(config_file, service_key_bytes)
    }

    /// Raw key bytes take precedence over the key file.
    pub fn from_config_file(
        config: ConfigFile,
        service_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, AccessServerError> {
        let service_key = match (service_key_bytes, &config.service_key) {
            (Some(bytes), _) => ServiceKey::from_bytes(&bytes).map_err(|e| {
                AccessServerError::PromptLock(e.into())
            })?,
            (None, Some(path)) => ServiceKey::read_from_file(path)?,
            (None, None) => return Err(AccessServerError::ServiceKeyMissing),
        };

        Ok(Self {
            service_key: Arc::new(service_key),
            program_id: config.program_id,
            max_auth_proof_age: config.max_auth_proof_age,
            logging: config.logging,
        })
    }
}

/// Server configuration file format.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct ConfigFile {
    /// The service key can be provided as a file or passed to the [`Config`]
    /// constructors.
    pub service_key: Option<PathBuf>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_program_id")]
    pub program_id: ProgramId,
    #[serde(with = "humantime_serde")]
    pub max_auth_proof_age: Duration,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_program_id() -> ProgramId {
    PROGRAM_ID
}

impl FromStr for ConfigFile {
    type Err = AccessServerError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}
