use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Service key must be base64: {0}")]
    InvalidServiceKey(base64::DecodeError),
    #[error("Opened content does not match what was published")]
    ContentMismatch,

    // Wrapped errors
    #[error(transparent)]
    AccessServer(#[from] promptlock_access_server::AccessServerError),
    #[error("Failed to access {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Index(#[from] promptlock_index::IndexError),
    #[error(transparent)]
    Ledger(#[from] promptlock::services::ledger::LedgerError),
    #[error(transparent)]
    MarketClient(#[from] promptlock_client::MarketClientError),
    #[error(transparent)]
    PromptLock(#[from] promptlock::PromptLockError),
    #[error(transparent)]
    Settlement(#[from] promptlock_settlement::SettlementError),
    #[error(transparent)]
    Storage(#[from] promptlock_memory::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
