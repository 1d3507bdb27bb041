use crate::{
    types::{
        content::ContentId,
        identity::{AccountAddress, WalletAddress},
        ledger::AccountData,
        transaction::{LedgerEvent, SignedTransaction, TransactionReceipt},
    },
    ErrorCategory,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the settlement program. A transaction that fails with
/// one of these has no effect on ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProgramError {
    #[error("Price must be greater than zero")]
    InvalidPrice,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Content {0} is already listed")]
    ListingAlreadyExists(ContentId),
    #[error("No listing for content {0}")]
    ListingNotFound(ContentId),
    #[error("Treasury {provided} is not the platform treasury {expected}")]
    TreasuryMismatch {
        expected: WalletAddress,
        provided: WalletAddress,
    },
    #[error("{buyer} already purchased {content_id}")]
    AlreadyPurchased {
        buyer: WalletAddress,
        content_id: ContentId,
    },
    #[error("Insufficient funds: {required} lamports required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },
    #[error("Transaction signature did not verify")]
    InvalidSignature,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Account {0} does not hold the expected record")]
    CorruptAccount(AccountAddress),
}

impl ProgramError {
    pub fn category(&self) -> ErrorCategory {
        use ProgramError::*;
        match self {
            InvalidPrice | InvalidArgument(_) | ListingNotFound(_) | InsufficientFunds { .. } => {
                ErrorCategory::Validation
            }
            ListingAlreadyExists(_) | AlreadyPurchased { .. } => ErrorCategory::Conflict,
            TreasuryMismatch { .. } | InvalidSignature => ErrorCategory::Authorization,
            ArithmeticOverflow | CorruptAccount(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::Program(e) => e.category(),
            LedgerError::Unavailable(_) => ErrorCategory::Transient,
        }
    }
}

/// Read and write access to a ledger hosting the settlement program.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Execute a signed instruction as one atomic transaction.
    async fn submit_transaction(
        &self,
        transaction: SignedTransaction,
    ) -> Result<TransactionReceipt, LedgerError>;

    async fn get_account(&self, address: &AccountAddress)
        -> Result<Option<AccountData>, LedgerError>;

    async fn account_exists(&self, address: &AccountAddress) -> Result<bool, LedgerError> {
        Ok(self.get_account(address).await?.is_some())
    }

    /// Native balance of `wallet`, in lamports.
    async fn balance(&self, wallet: &WalletAddress) -> Result<u64, LedgerError>;

    /// Confirmed events with a slot strictly greater than `slot`, oldest
    /// first.
    async fn events_since(&self, slot: u64) -> Result<Vec<LedgerEvent>, LedgerError>;
}
