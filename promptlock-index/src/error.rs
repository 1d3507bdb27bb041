use promptlock::{services::ledger::LedgerError, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Purchase of {0} arrived before its listing")]
    UnknownCourse(String),
    #[error("Index store error: {0}")]
    Store(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl IndexError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IndexError::UnknownCourse(_) => ErrorCategory::Integrity,
            IndexError::Store(_) => ErrorCategory::Internal,
            IndexError::Ledger(e) => e.category(),
        }
    }
}
