//! Config parsing across every component.

use std::{str::FromStr, time::Duration};

use colored::Colorize;
use promptlock_access_server::AccessServerError;
use promptlock_settlement::SettlementError;

use crate::{
    config::Config,
    error::Result,
    run_parallel,
    utils::{report_test_results, TestResult},
};

pub async fn run_tests(config: &Config) -> Result<Vec<TestResult>> {
    println!("{}", "Running config file tests".cyan());

    let results = run_parallel!(
        config.clone(),
        client_config_parses(),
        access_server_config_with_manual_key_works(),
        access_server_config_without_key_fails(),
        program_config_rejects_oversized_share(),
        storage_config_parses(),
    )?;

    println!("config file tests: {}", report_test_results(&results));

    Ok(results)
}

async fn client_config_parses() -> Result<()> {
    use promptlock_client::Config as ClientConfig;

    let config = ClientConfig::from_str(CLIENT_CONFIG)?;
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.retry.max_attempts, 4);

    Ok(())
}

async fn access_server_config_with_manual_key_works() -> Result<()> {
    use promptlock_access_server::config::{Config as ServerConfig, ConfigFile};

    let config_file = ConfigFile::from_str(ACCESS_SERVER_CONFIG_NO_KEY)?;
    let config = ServerConfig::from_config_file(config_file, Some(vec![7; 32]))?;
    assert_eq!(config.max_auth_proof_age, Duration::from_secs(120));

    Ok(())
}

async fn access_server_config_without_key_fails() -> Result<()> {
    use promptlock_access_server::config::{Config as ServerConfig, ConfigFile};

    let config_file = ConfigFile::from_str(ACCESS_SERVER_CONFIG_NO_KEY)?;
    let config = ServerConfig::from_config_file(config_file, None);
    assert!(matches!(config, Err(AccessServerError::ServiceKeyMissing)));

    Ok(())
}

async fn program_config_rejects_oversized_share() -> Result<()> {
    use promptlock_settlement::ProgramConfig;

    let config = ProgramConfig::from_str("seller_share_bps = 9000")?;
    assert_eq!(config.seller_share_bps, 9000);

    let config = ProgramConfig::from_str("seller_share_bps = 10001");
    assert!(matches!(
        config,
        Err(SettlementError::InvalidSellerShare(10001))
    ));

    Ok(())
}

async fn storage_config_parses() -> Result<()> {
    use promptlock_memory::Config as StorageConfig;

    let config = StorageConfig::from_str("max_object_size = 1024")?;
    assert_eq!(config.max_object_size, 1024);
    assert!(StorageConfig::from_str("max_object_size = -1").is_err());

    Ok(())
}

const CLIENT_CONFIG: &str = r#"
request_timeout = "30s"

[retry]
max_attempts = 4
initial_backoff = "100ms"
max_backoff = "2s"
"#;

const ACCESS_SERVER_CONFIG_NO_KEY: &str = r#"
max_auth_proof_age = "2m"

[logging]
stdout_log_level = "INFO"
"#;
