use promptlock::{ErrorCategory, PromptLockError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up the settlement program. Errors raised by
/// the program itself are [`promptlock::services::ledger::ProgramError`]s.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Seller share of {0} basis points exceeds 10000")]
    InvalidSellerShare(u64),

    #[error(transparent)]
    PromptLock(#[from] PromptLockError),
    #[error("Failed to read {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl SettlementError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SettlementError::PromptLock(e) => e.category(),
            SettlementError::InvalidSellerShare(_)
            | SettlementError::FileIo(..)
            | SettlementError::Toml(_) => ErrorCategory::Internal,
        }
    }
}
