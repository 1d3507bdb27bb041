use crate::server::database::DatabaseError;
use promptlock::{
    crypto::CryptoError,
    services::{access_control::AccessControlError, ledger::LedgerError},
    ErrorCategory, PromptLockError,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessServerError {
    #[error("Service key was not provided.")]
    ServiceKeyMissing,

    // Protocol errors
    #[error("Authentication proof rejected: {0}")]
    InvalidAuthProof(PromptLockError),
    #[error("Requester does not satisfy the access condition")]
    AccessDenied,
    #[error("Condition refers to program {0}, which this service does not serve")]
    UnknownProgram(String),

    // Wrapped errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Failed to read {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    PromptLock(#[from] PromptLockError),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl AccessServerError {
    pub fn category(&self) -> ErrorCategory {
        AccessControlError::from(self).category()
    }
}

impl From<&AccessServerError> for AccessControlError {
    fn from(error: &AccessServerError) -> Self {
        match error {
            AccessServerError::AccessDenied => AccessControlError::AccessDenied,
            AccessServerError::InvalidAuthProof(e) => {
                AccessControlError::InvalidAuthProof(e.to_string())
            }
            AccessServerError::UnknownProgram(_) => AccessControlError::Rejected(error.to_string()),
            AccessServerError::Ledger(LedgerError::Unavailable(e)) => {
                AccessControlError::Unavailable(e.clone())
            }
            AccessServerError::PromptLock(PromptLockError::Crypto(e)) => match e {
                CryptoError::ConditionMismatch => AccessControlError::ConditionMismatch,
                CryptoError::LockHashMismatch
                | CryptoError::DecryptionFailed
                | CryptoError::ConversionError => AccessControlError::LockHashMismatch,
                _ => AccessControlError::Internal,
            },

            // Errors that the caller should not see
            AccessServerError::ServiceKeyMissing
            | AccessServerError::Database(_)
            | AccessServerError::FileIo(..)
            | AccessServerError::Ledger(LedgerError::Program(_))
            | AccessServerError::PromptLock(_)
            | AccessServerError::Toml(_) => AccessControlError::Internal,
        }
    }
}

impl From<AccessServerError> for AccessControlError {
    fn from(error: AccessServerError) -> Self {
        (&error).into()
    }
}
