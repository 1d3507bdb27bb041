use promptlock::{
    crypto::CryptoError,
    services::{
        access_control::AccessControlError, ledger::LedgerError, storage::StorageError,
        wallet::WalletError,
    },
    types::content::ContentId,
    ErrorCategory, PromptLockError,
};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketClientError>;

#[derive(Debug, Error)]
pub enum MarketClientError {
    #[error("Failed to lock the content key: {0}")]
    EncryptionFailed(String),
    #[error("The wallet declined to sign")]
    WalletRefused,
    #[error("Access condition not met")]
    AccessDenied,
    #[error("Decrypted content failed its integrity check")]
    DecryptionIntegrity,
    #[error("No listing for content {0}")]
    ListingNotFound(ContentId),
    #[error("Stored bundle is for {found}, not {expected}")]
    BundleMismatch { expected: ContentId, found: ContentId },
    #[error("{0} timed out")]
    Timeout(&'static str),

    // Wrapped errors
    #[error(transparent)]
    AccessControl(AccessControlError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("Failed to read {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    PromptLock(PromptLockError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Wallet(WalletError),
}

impl MarketClientError {
    pub fn category(&self) -> ErrorCategory {
        use MarketClientError::*;
        match self {
            EncryptionFailed(_) | Timeout(_) => ErrorCategory::Transient,
            WalletRefused | AccessDenied => ErrorCategory::Authorization,
            DecryptionIntegrity | BundleMismatch { .. } => ErrorCategory::Integrity,
            ListingNotFound(_) => ErrorCategory::Validation,
            AccessControl(e) => e.category(),
            Crypto(e) => e.category(),
            Ledger(e) => e.category(),
            PromptLock(e) => e.category(),
            Storage(e) => e.category(),
            Wallet(e) => e.category(),
            FileIo(..) | Toml(_) => ErrorCategory::Internal,
        }
    }
}

impl From<WalletError> for MarketClientError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::Refused => Self::WalletRefused,
            _ => Self::Wallet(error),
        }
    }
}

impl From<PromptLockError> for MarketClientError {
    fn from(error: PromptLockError) -> Self {
        match error {
            PromptLockError::Wallet(e) => e.into(),
            PromptLockError::Crypto(e) => e.into(),
            _ => Self::PromptLock(error),
        }
    }
}

impl From<AccessControlError> for MarketClientError {
    fn from(error: AccessControlError) -> Self {
        match error {
            AccessControlError::AccessDenied => Self::AccessDenied,
            _ => Self::AccessControl(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_refusal_is_not_retryable() {
        let error = MarketClientError::from(PromptLockError::Wallet(WalletError::Refused));
        assert!(matches!(error, MarketClientError::WalletRefused));
        assert!(!error.category().is_retryable());

        let error = MarketClientError::from(WalletError::Unavailable("closed".into()));
        assert!(error.category().is_retryable());
    }

    #[test]
    fn categories_follow_the_cause() {
        assert!(MarketClientError::EncryptionFailed("down".into())
            .category()
            .is_retryable());
        assert_eq!(
            MarketClientError::from(AccessControlError::AccessDenied).category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            MarketClientError::from(LedgerError::Unavailable("down".into())).category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            MarketClientError::DecryptionIntegrity.category(),
            ErrorCategory::Integrity
        );
    }
}
