use crate::{types::content::StoragePointer, ErrorCategory};
use async_trait::async_trait;
use sha3::{Digest, Sha3_256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("No object stored at {0}")]
    NotFound(StoragePointer),
    #[error("Object of {size} bytes exceeds the maximum of {max}")]
    TooLarge { size: usize, max: usize },
    #[error("Object at {0} does not match its address")]
    Corrupted(StoragePointer),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StorageError::NotFound(_) | StorageError::TooLarge { .. } => ErrorCategory::Validation,
            StorageError::Corrupted(_) => ErrorCategory::Integrity,
            StorageError::Unavailable(_) => ErrorCategory::Transient,
        }
    }
}

/// Permanent, content-addressed object storage. Objects are never updated in
/// place.
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Store `bytes` and return their address. Storing the same bytes twice
    /// returns the same address.
    async fn put(&self, bytes: Vec<u8>) -> Result<StoragePointer, StorageError>;

    /// Return exactly the bytes stored at `pointer`.
    async fn get(&self, pointer: &StoragePointer) -> Result<Vec<u8>, StorageError>;
}

/// The address of `bytes` in content-addressed storage.
pub fn content_address(bytes: &[u8]) -> StoragePointer {
    StoragePointer::new(hex::encode(Sha3_256::digest(bytes)))
}

/// Check that `bytes` really are the object addressed by `pointer`.
pub fn verify_content_address(pointer: &StoragePointer, bytes: &[u8]) -> Result<(), StorageError> {
    if &content_address(bytes) != pointer {
        return Err(StorageError::Corrupted(pointer.clone()));
    }
    Ok(())
}
