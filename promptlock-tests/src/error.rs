use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptLockTestError>;

#[derive(Debug, Error)]
pub enum PromptLockTestError {
    #[error("Invalid test type: {0}")]
    InvalidTestType(String),

    // Wrapped Errors
    #[error("AccessServerError: {0:?}")]
    AccessServer(#[from] promptlock_access_server::AccessServerError),
    #[error("DatabaseError: {0:?}")]
    Database(#[from] promptlock_access_server::server::database::DatabaseError),
    #[error("IndexError: {0:?}")]
    Index(#[from] promptlock_index::IndexError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("LedgerError: {0:?}")]
    Ledger(#[from] promptlock::services::ledger::LedgerError),
    #[error("MarketClientError: {0:?}")]
    MarketClient(#[from] promptlock_client::MarketClientError),
    #[error("PromptLockError: {0:?}")]
    PromptLock(#[from] promptlock::PromptLockError),
    #[error("SettlementError: {0:?}")]
    Settlement(#[from] promptlock_settlement::SettlementError),
    #[error("StorageConfigError: {0:?}")]
    StorageConfig(#[from] promptlock_memory::Error),
    #[error("StorageError: {0:?}")]
    Storage(#[from] promptlock::services::storage::StorageError),
}
