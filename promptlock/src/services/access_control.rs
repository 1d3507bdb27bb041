use crate::{
    types::operations::{LockRequest, LockResponse, UnlockRequest, UnlockResponse},
    ErrorCategory,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors the access-control service reports to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessControlError {
    #[error("Access condition not met")]
    AccessDenied,
    #[error("Invalid authentication proof: {0}")]
    InvalidAuthProof(String),
    #[error("Condition does not match the one the secret was locked under")]
    ConditionMismatch,
    #[error("Locked secret failed its integrity check")]
    LockHashMismatch,
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Access-control service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal server error")]
    Internal,
}

impl AccessControlError {
    pub fn category(&self) -> ErrorCategory {
        use AccessControlError::*;
        match self {
            AccessDenied | InvalidAuthProof(_) => ErrorCategory::Authorization,
            ConditionMismatch | LockHashMismatch => ErrorCategory::Integrity,
            Rejected(_) => ErrorCategory::Validation,
            Unavailable(_) => ErrorCategory::Transient,
            Internal => ErrorCategory::Internal,
        }
    }
}

/// A service that holds secrets hostage to an on-chain condition.
#[async_trait]
pub trait AccessControlService: Send + Sync {
    /// Lock `secret` under `condition`. The auth proof identifies who asked.
    async fn lock(&self, request: LockRequest) -> Result<LockResponse, AccessControlError>;

    /// Release a locked secret if the requester satisfies the condition right
    /// now.
    async fn unlock(&self, request: UnlockRequest) -> Result<UnlockResponse, AccessControlError>;
}
