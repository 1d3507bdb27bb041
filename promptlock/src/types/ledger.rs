//! Records held in ledger account storage by the settlement program.

use crate::{
    types::{
        content::{ContentId, StoragePointer},
        identity::WalletAddress,
    },
    PromptLockError,
};
use serde::{Deserialize, Serialize};

/// One per content id. Created once by `list_content`; only
/// `purchase_count` changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub content_id: ContentId,
    pub seller: WalletAddress,
    /// In lamports.
    pub price: u64,
    pub storage_pointer: StoragePointer,
    pub title: String,
    pub purchase_count: u64,
    /// Lamports the seller locked to pay for this record's storage.
    pub rent_deposit: u64,
    pub listed_at_slot: u64,
}

/// Proof that `buyer` purchased `content_id`. Created once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub buyer: WalletAddress,
    pub content_id: ContentId,
    pub price_paid: u64,
    pub seller_share: u64,
    pub treasury_share: u64,
    pub purchased_at_slot: u64,
}

/// Contents of a program-owned account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountData {
    Listing(Listing),
    Receipt(Receipt),
}

impl AccountData {
    pub fn as_listing(&self) -> Option<&Listing> {
        match self {
            AccountData::Listing(listing) => Some(listing),
            AccountData::Receipt(_) => None,
        }
    }

    pub fn as_receipt(&self) -> Option<&Receipt> {
        match self {
            AccountData::Receipt(receipt) => Some(receipt),
            AccountData::Listing(_) => None,
        }
    }

    /// Size of the record as stored on the ledger. Rent is charged on this.
    pub fn serialized_len(&self) -> Result<u64, PromptLockError> {
        Ok(bincode::serialized_size(self)?)
    }
}
