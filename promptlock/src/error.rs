use crate::{crypto::CryptoError, services::wallet::WalletError};
use std::path::PathBuf;
use strum::Display;
use thiserror::Error;

/// Coarse classification shared by every error in the workspace. Callers use
/// it to decide whether an operation may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCategory {
    /// Bad input. Rejected before any state change.
    Validation,
    /// The target slot already holds a record.
    Conflict,
    /// The caller is not allowed to do this. No funds or keys moved.
    Authorization,
    /// Data failed an integrity check.
    Integrity,
    /// A collaborator was unreachable. Safe to retry with backoff.
    Transient,
    /// Misconfiguration or a bug.
    Internal,
}

impl ErrorCategory {
    pub fn is_retryable(self) -> bool {
        self == ErrorCategory::Transient
    }
}

#[derive(Debug, Error)]
pub enum PromptLockError {
    #[error("Content id must not be empty")]
    EmptyContentId,
    #[error("Content id is {len} bytes, the maximum is {max}")]
    ContentIdTooLong { len: usize, max: usize },
    #[error("{field} is {len} bytes, the maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Authentication proof signature did not verify")]
    InvalidAuthProof,
    #[error("Authentication proof address does not match its verifying key")]
    AuthProofAddressMismatch,
    #[error("Authentication proof expired")]
    AuthProofExpired,
    #[error("Authentication proof was issued in the future")]
    AuthProofFromFuture,
    #[error("Transaction signature did not verify")]
    InvalidTransactionSignature,
    #[error("Invalid log file path: {0}")]
    InvalidLogFilePath(PathBuf),
    #[error("Failed to install the logging subscriber: {0}")]
    LoggingInit(String),

    // Wrapped errors
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to read {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl PromptLockError {
    pub fn category(&self) -> ErrorCategory {
        use PromptLockError::*;
        match self {
            EmptyContentId | ContentIdTooLong { .. } | FieldTooLong { .. } | InvalidAddress(_) => {
                ErrorCategory::Validation
            }
            InvalidAuthProof
            | AuthProofAddressMismatch
            | AuthProofExpired
            | AuthProofFromFuture
            | InvalidTransactionSignature => ErrorCategory::Authorization,
            Crypto(e) => e.category(),
            Wallet(e) => e.category(),
            InvalidLogFilePath(_)
            | LoggingInit(_)
            | Bincode(_)
            | Io(_)
            | FileIo(..)
            | SerdeJson(_)
            | Toml(_) => ErrorCategory::Internal,
        }
    }
}
