use crate::{types::identity::WalletAddress, ErrorCategory};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("The wallet declined to sign")]
    Refused,
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),
}

impl WalletError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WalletError::Refused => ErrorCategory::Authorization,
            WalletError::Unavailable(_) => ErrorCategory::Transient,
        }
    }
}

/// Signing capability of a single wallet. Passed explicitly to every call
/// that acts on behalf of a user.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> WalletAddress;

    /// SEC1-compressed secp256k1 verifying key.
    fn verifying_key(&self) -> Vec<u8>;

    /// Produce a 64-byte ECDSA signature over `message`. A wallet fronting a
    /// user may refuse.
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError>;
}
