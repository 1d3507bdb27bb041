pub mod config;
pub mod error;
pub mod market;
pub mod test_suites;
pub mod utils;

use clap::Parser;
use config::Config;
use error::PromptLockTestError;
use std::{path::PathBuf, str::FromStr};

#[derive(Debug, Parser)]
pub struct Cli {
    #[clap(long, default_value = "./dev/local/Client.toml")]
    pub client_config: PathBuf,
    #[clap(long, default_value = "./dev/local/AccessServer.toml")]
    pub access_server_config: PathBuf,
    #[clap(long, default_value = "./dev/local/Program.toml")]
    pub program_config: PathBuf,
    #[clap(long, default_value = "./dev/local/Storage.toml")]
    pub storage_config: PathBuf,
    #[clap(long = "filter")]
    pub filters: Option<Vec<String>>,
    #[clap(long, default_value = "all")]
    pub test_type: TestType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestType {
    All,
    AccessControl,
    ConfigFiles,
    E2E,
    Index,
    Settlement,
}

impl FromStr for TestType {
    type Err = PromptLockTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TestType::All),
            "access-control" => Ok(TestType::AccessControl),
            "config-files" => Ok(TestType::ConfigFiles),
            "e2e" => Ok(TestType::E2E),
            "index" => Ok(TestType::Index),
            "settlement" => Ok(TestType::Settlement),
            _ => Err(PromptLockTestError::InvalidTestType(s.to_string())),
        }
    }
}

#[tokio::main]
pub async fn main() {
    let cli = Cli::parse();
    let test_type = cli.test_type;
    let config = Config::try_from(cli).unwrap();

    let results = test_suites::run(test_type, &config).await.unwrap();
    if results.iter().any(|result| *result == utils::TestResult::Failed) {
        std::process::exit(1);
    }
}
