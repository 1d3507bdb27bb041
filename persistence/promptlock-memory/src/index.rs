use async_trait::async_trait;
use promptlock::types::{content::ContentId, identity::WalletAddress};
use promptlock_index::{CourseRecord, IndexError, IndexStore, LibraryEntry};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct IndexState {
    courses: HashMap<ContentId, CourseRecord>,
    libraries: HashMap<WalletAddress, Vec<LibraryEntry>>,
    cursor: u64,
}

/// [`IndexStore`] held in memory.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    state: RwLock<IndexState>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn insert_course(&self, course: CourseRecord) -> Result<bool, IndexError> {
        let mut state = self.state.write().await;
        if state.courses.contains_key(&course.content_id) {
            return Ok(false);
        }
        let _ = state.courses.insert(course.content_id.clone(), course);
        Ok(true)
    }

    async fn course(&self, content_id: &ContentId) -> Result<Option<CourseRecord>, IndexError> {
        Ok(self.state.read().await.courses.get(content_id).cloned())
    }

    async fn courses(&self) -> Result<Vec<CourseRecord>, IndexError> {
        let mut courses: Vec<_> = self.state.read().await.courses.values().cloned().collect();
        courses.sort_by_key(|course| course.listed_at_slot);
        Ok(courses)
    }

    async fn record_purchase(
        &self,
        wallet: &WalletAddress,
        entry: LibraryEntry,
    ) -> Result<bool, IndexError> {
        let mut state = self.state.write().await;
        let IndexState {
            courses, libraries, ..
        } = &mut *state;

        let course = courses
            .get_mut(&entry.content_id)
            .ok_or_else(|| IndexError::UnknownCourse(entry.content_id.to_string()))?;
        let library = libraries.entry(*wallet).or_default();
        if library
            .iter()
            .any(|existing| existing.content_id == entry.content_id)
        {
            return Ok(false);
        }

        library.push(entry);
        course.purchase_count += 1;
        Ok(true)
    }

    async fn library(&self, wallet: &WalletAddress) -> Result<Vec<LibraryEntry>, IndexError> {
        Ok(self
            .state
            .read()
            .await
            .libraries
            .get(wallet)
            .cloned()
            .unwrap_or_default())
    }

    async fn cursor(&self) -> Result<u64, IndexError> {
        Ok(self.state.read().await.cursor)
    }

    async fn set_cursor(&self, slot: u64) -> Result<(), IndexError> {
        self.state.write().await.cursor = slot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlock::{
        constants::PLATFORM_TREASURY,
        crypto::WalletKeyPair,
        services::{ledger::LedgerRpc, wallet::Wallet},
        types::{
            content::StoragePointer,
            transaction::{Instruction, SignedTransaction},
        },
    };
    use promptlock_index::Indexer;
    use promptlock_settlement::{Ledger, ProgramConfig};
    use std::sync::Arc;

    const PRICE: u64 = 1_000_000;

    async fn submit(ledger: &Ledger, wallet: &WalletKeyPair, instruction: Instruction) {
        let transaction = SignedTransaction::sign(wallet, ledger.program_id(), instruction)
            .await
            .unwrap();
        let _ = ledger.submit_transaction(transaction).await.unwrap();
    }

    fn list(id: &str) -> Instruction {
        Instruction::ListContent {
            content_id: ContentId::new(id).unwrap(),
            storage_pointer: StoragePointer::new(format!("{id}-pointer")),
            title: format!("Title of {id}"),
            price: PRICE,
        }
    }

    fn buy(id: &str) -> Instruction {
        Instruction::BuyContent {
            content_id: ContentId::new(id).unwrap(),
            treasury: PLATFORM_TREASURY,
        }
    }

    async fn setup() -> (Arc<Ledger>, Indexer<MemoryIndexStore>, WalletKeyPair, WalletKeyPair) {
        let mut rng = rand::thread_rng();
        let ledger = Arc::new(Ledger::new(ProgramConfig::default()));
        let seller = WalletKeyPair::generate(&mut rng);
        let buyer = WalletKeyPair::generate(&mut rng);
        let _ = ledger.airdrop(&seller.address(), 100 * PRICE).await.unwrap();
        let _ = ledger.airdrop(&buyer.address(), 100 * PRICE).await.unwrap();

        let indexer = Indexer::new(ledger.clone(), Arc::new(MemoryIndexStore::new()));
        (ledger, indexer, seller, buyer)
    }

    #[tokio::test]
    async fn indexer_builds_catalog_and_libraries() -> Result<(), IndexError> {
        let (ledger, indexer, seller, buyer) = setup().await;
        submit(&ledger, &seller, list("course_1")).await;
        submit(&ledger, &seller, list("course_2")).await;
        submit(&ledger, &buyer, buy("course_2")).await;

        assert_eq!(indexer.sync().await?, 3);

        let courses = indexer.courses().await?;
        assert_eq!(
            courses
                .iter()
                .map(|course| course.content_id.as_str())
                .collect::<Vec<_>>(),
            vec!["course_1", "course_2"]
        );
        assert_eq!(courses[0].seller, seller.address());
        assert_eq!(courses[0].price, PRICE);
        assert_eq!(courses[1].purchase_count, 1);

        let library = indexer.library(&buyer.address()).await?;
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].content_id.as_str(), "course_2");
        assert_eq!(library[0].purchased_at_slot, 3);
        assert!(indexer.library(&seller.address()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn sync_only_applies_new_events() -> Result<(), IndexError> {
        let (ledger, indexer, seller, buyer) = setup().await;
        submit(&ledger, &seller, list("course_1")).await;
        assert_eq!(indexer.sync().await?, 1);
        assert_eq!(indexer.sync().await?, 0);

        submit(&ledger, &buyer, buy("course_1")).await;
        assert_eq!(indexer.sync().await?, 1);
        assert_eq!(indexer.store().cursor().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn replayed_events_are_ignored() -> Result<(), IndexError> {
        let (ledger, indexer, seller, buyer) = setup().await;
        submit(&ledger, &seller, list("course_1")).await;
        submit(&ledger, &buyer, buy("course_1")).await;
        let _ = indexer.sync().await?;

        for event in ledger.events_since(0).await? {
            assert!(!indexer.apply(&event).await?);
        }

        let course = indexer
            .course(&ContentId::new("course_1").unwrap())
            .await?
            .unwrap();
        assert_eq!(course.purchase_count, 1);
        assert_eq!(indexer.library(&buyer.address()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn purchase_without_listing_is_an_error() -> Result<(), IndexError> {
        let (ledger, indexer, seller, buyer) = setup().await;
        submit(&ledger, &seller, list("course_1")).await;
        submit(&ledger, &buyer, buy("course_1")).await;

        let events = ledger.events_since(0).await?;
        let error = indexer.apply(&events[1]).await.unwrap_err();
        assert_eq!(error, IndexError::UnknownCourse("course_1".into()));
        Ok(())
    }

    #[tokio::test]
    async fn failed_purchase_is_recorded_in_full_on_retry() -> Result<(), IndexError> {
        let (ledger, indexer, seller, buyer) = setup().await;
        submit(&ledger, &seller, list("course_1")).await;
        submit(&ledger, &buyer, buy("course_1")).await;
        let events = ledger.events_since(0).await?;

        // The failed write left nothing behind
        assert!(indexer.apply(&events[1]).await.is_err());
        assert!(indexer.library(&buyer.address()).await?.is_empty());

        assert!(indexer.apply(&events[0]).await?);
        assert!(indexer.apply(&events[1]).await?);
        assert!(!indexer.apply(&events[1]).await?);

        let course = indexer
            .course(&ContentId::new("course_1").unwrap())
            .await?
            .unwrap();
        assert_eq!(course.purchase_count, 1);
        assert_eq!(indexer.library(&buyer.address()).await?.len(), 1);
        Ok(())
    }
}
