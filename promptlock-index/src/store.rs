use crate::IndexError;
use async_trait::async_trait;
use promptlock::types::{
    content::{ContentId, StoragePointer},
    identity::WalletAddress,
    transaction::TxSignature,
};
use serde::{Deserialize, Serialize};

/// A listed course as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub content_id: ContentId,
    pub title: String,
    pub price: u64,
    pub storage_pointer: StoragePointer,
    pub seller: WalletAddress,
    /// Signature of the listing transaction.
    pub tx_signature: TxSignature,
    pub listed_at_slot: u64,
    pub purchase_count: u64,
}

/// One purchased course in a wallet's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub content_id: ContentId,
    pub tx_signature: TxSignature,
    pub purchased_at_slot: u64,
}

/// Backing storage for the read model.
///
/// Inserts are conditional so that replaying an event is harmless.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Returns `false` if the course is already indexed.
    async fn insert_course(&self, course: CourseRecord) -> Result<bool, IndexError>;

    async fn course(&self, content_id: &ContentId) -> Result<Option<CourseRecord>, IndexError>;

    /// Every indexed course, ordered by listing slot.
    async fn courses(&self) -> Result<Vec<CourseRecord>, IndexError>;

    /// Add `entry` to `wallet`'s library and bump the course's purchase
    /// count, as one write. Returns `false`, changing nothing, if the library
    /// already holds the course. Fails with [`IndexError::UnknownCourse`],
    /// changing nothing, if the course isn't indexed.
    async fn record_purchase(
        &self,
        wallet: &WalletAddress,
        entry: LibraryEntry,
    ) -> Result<bool, IndexError>;

    async fn library(&self, wallet: &WalletAddress) -> Result<Vec<LibraryEntry>, IndexError>;

    /// Slot of the last event applied.
    async fn cursor(&self) -> Result<u64, IndexError>;

    async fn set_cursor(&self, slot: u64) -> Result<(), IndexError>;
}
