use crate::{CourseRecord, IndexError, IndexStore, LibraryEntry};
use promptlock::{
    services::ledger::LedgerRpc,
    types::{
        content::ContentId,
        identity::WalletAddress,
        transaction::{LedgerEvent, MarketEvent},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Applies ledger events to an [`IndexStore`].
pub struct Indexer<S: IndexStore> {
    ledger: Arc<dyn LedgerRpc>,
    store: Arc<S>,
}

impl<S: IndexStore> Indexer<S> {
    pub fn new(ledger: Arc<dyn LedgerRpc>, store: Arc<S>) -> Self {
        Self { ledger, store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Apply every event confirmed since the last sync. Returns the number of
    /// events that changed the index.
    #[instrument(skip_all, err(Debug))]
    pub async fn sync(&self) -> Result<usize, IndexError> {
        let cursor = self.store.cursor().await?;
        let events = self.ledger.events_since(cursor).await?;

        let mut applied = 0;
        for event in &events {
            if self.apply(event).await? {
                applied += 1;
            }
            self.store.set_cursor(event.slot).await?;
        }

        info!("Indexed {} of {} new events", applied, events.len());
        Ok(applied)
    }

    /// Apply one event. Duplicates are ignored and reported as `false`.
    pub async fn apply(&self, event: &LedgerEvent) -> Result<bool, IndexError> {
        match &event.event {
            MarketEvent::ContentListed {
                content_id,
                seller,
                price,
                storage_pointer,
                title,
            } => {
                let course = CourseRecord {
                    content_id: content_id.clone(),
                    title: title.clone(),
                    price: *price,
                    storage_pointer: storage_pointer.clone(),
                    seller: *seller,
                    tx_signature: event.signature.clone(),
                    listed_at_slot: event.slot,
                    purchase_count: 0,
                };
                let inserted = self.store.insert_course(course).await?;
                if !inserted {
                    debug!("Listing of {} already indexed", content_id);
                }
                Ok(inserted)
            }
            MarketEvent::ContentPurchased {
                content_id, buyer, ..
            } => {
                let entry = LibraryEntry {
                    content_id: content_id.clone(),
                    tx_signature: event.signature.clone(),
                    purchased_at_slot: event.slot,
                };
                let inserted = self.store.record_purchase(buyer, entry).await?;
                if !inserted {
                    debug!("Purchase of {} by {} already indexed", content_id, buyer);
                }
                Ok(inserted)
            }
        }
    }

    pub async fn courses(&self) -> Result<Vec<CourseRecord>, IndexError> {
        self.store.courses().await
    }

    pub async fn course(&self, content_id: &ContentId) -> Result<Option<CourseRecord>, IndexError> {
        self.store.course(content_id).await
    }

    pub async fn library(&self, wallet: &WalletAddress) -> Result<Vec<LibraryEntry>, IndexError> {
        self.store.library(wallet).await
    }
}
