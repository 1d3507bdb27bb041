//! Public API of the marketplace client.
//!
//! Sellers call [`MarketClient::publish`] (or the individual steps
//! [`MarketClient::encrypt`], storage, and [`MarketClient::list_content`]).
//! Buyers call [`MarketClient::buy_content`] and then
//! [`MarketClient::open_content`].

mod access;
mod decrypt;
mod encrypt;
mod publish;
mod purchase;

use crate::{MarketClient, Result};
use promptlock::{
    services::wallet::Wallet,
    types::{
        bundle::{BundleMetadata, EncryptedBundle},
        condition::AccessCondition,
        content::{ContentId, StoragePointer},
        identity::WalletAddress,
        ledger::Listing,
        transaction::TransactionReceipt,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// Everything a seller needs to know about content they just published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedContent {
    pub storage_pointer: StoragePointer,
    pub receipt: TransactionReceipt,
}

impl MarketClient {
    /// Encrypt `plaintext` under a fresh content key and have the
    /// access-control service lock that key under `condition`. Only the key
    /// leaves the process.
    #[instrument(skip_all, err(Debug), fields(request_id))]
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        condition: AccessCondition,
        metadata: BundleMetadata,
        wallet: &dyn Wallet,
    ) -> Result<EncryptedBundle> {
        record_request_id();
        info!("Starting encrypt operation.");
        let bundle = self
            .handle_encrypt(plaintext, condition, metadata, wallet)
            .await?;
        info!("Successfully completed encrypt operation.");
        Ok(bundle)
    }

    /// Recover the plaintext of `bundle` for `wallet`. The access-control
    /// service checks the bundle's condition against the ledger before it
    /// releases the key.
    #[instrument(skip_all, err(Debug), fields(request_id))]
    pub async fn decrypt(&self, bundle: &EncryptedBundle, wallet: &dyn Wallet) -> Result<Vec<u8>> {
        record_request_id();
        info!("Starting decrypt operation.");
        let plaintext = self.handle_decrypt(bundle, wallet).await?;
        info!("Successfully completed decrypt operation.");
        Ok(plaintext)
    }

    /// Encrypt, store, and list `plaintext` for sale at `price` lamports.
    #[instrument(skip_all, err(Debug), fields(request_id, content_id = %content_id))]
    pub async fn publish(
        &self,
        plaintext: &[u8],
        content_id: ContentId,
        title: &str,
        price: u64,
        wallet: &dyn Wallet,
    ) -> Result<PublishedContent> {
        record_request_id();
        info!("Starting publish operation.");
        let published = self
            .handle_publish(plaintext, content_id, title, price, wallet)
            .await?;
        info!("Successfully completed publish operation.");
        Ok(published)
    }

    /// Submit a `list_content` transaction signed by `wallet`.
    #[instrument(skip_all, err(Debug), fields(request_id, content_id = %content_id))]
    pub async fn list_content(
        &self,
        content_id: ContentId,
        storage_pointer: StoragePointer,
        title: &str,
        price: u64,
        wallet: &dyn Wallet,
    ) -> Result<TransactionReceipt> {
        record_request_id();
        info!("Starting list_content operation.");
        let receipt = self
            .handle_list_content(content_id, storage_pointer, title, price, wallet)
            .await?;
        info!("Successfully completed list_content operation.");
        Ok(receipt)
    }

    /// Submit a `buy_content` transaction signed by `wallet`. The platform
    /// treasury is filled in by the client.
    #[instrument(skip_all, err(Debug), fields(request_id, content_id = %content_id))]
    pub async fn buy_content(
        &self,
        content_id: ContentId,
        wallet: &dyn Wallet,
    ) -> Result<TransactionReceipt> {
        record_request_id();
        info!("Starting buy_content operation.");
        let receipt = self.handle_buy_content(content_id, wallet).await?;
        info!("Successfully completed buy_content operation.");
        Ok(receipt)
    }

    /// Whether `buyer` holds a receipt for `content_id`.
    #[instrument(skip_all, err(Debug))]
    pub async fn has_access(&self, buyer: &WalletAddress, content_id: &ContentId) -> Result<bool> {
        self.handle_has_access(buyer, content_id).await
    }

    /// The on-chain listing for `content_id`, if there is one.
    #[instrument(skip_all, err(Debug))]
    pub async fn listing(&self, content_id: &ContentId) -> Result<Option<Listing>> {
        self.handle_listing(content_id).await
    }

    /// Native balance of `wallet`, in lamports.
    pub async fn balance(&self, wallet: &WalletAddress) -> Result<u64> {
        self.call("balance", || self.ledger.balance(wallet)).await
    }

    /// Look up the listing, fetch its bundle from storage, and decrypt it
    /// for `wallet`.
    #[instrument(skip_all, err(Debug), fields(request_id, content_id = %content_id))]
    pub async fn open_content(&self, content_id: &ContentId, wallet: &dyn Wallet) -> Result<Vec<u8>> {
        record_request_id();
        info!("Starting open_content operation.");
        let plaintext = self.handle_open_content(content_id, wallet).await?;
        info!("Successfully completed open_content operation.");
        Ok(plaintext)
    }
}

fn record_request_id() {
    promptlock::infrastructure::logging::record_field("request_id", &Uuid::new_v4());
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::RetryConfig, Config, MarketClientError};
    use async_trait::async_trait;
    use promptlock::{
        constants::{LAMPORTS_PER_TOKEN, PLATFORM_TREASURY, PROGRAM_ID},
        crypto::{ServiceKey, WalletKeyPair},
        services::{
            access_control::{AccessControlError, AccessControlService},
            ledger::{LedgerError, LedgerRpc},
            wallet::WalletError,
        },
        types::{
            identity::AccountAddress,
            ledger::AccountData,
            operations::{LockRequest, LockResponse, UnlockRequest, UnlockResponse},
            transaction::{Instruction, LedgerEvent, MarketEvent, SignedTransaction},
        },
        ErrorCategory,
    };
    use promptlock_access_server::AccessServer;
    use promptlock_memory::{MemoryAuditStore, MemoryStorage};
    use promptlock_settlement::{Ledger, ProgramConfig};
    use std::{
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc,
        },
        time::Duration,
    };

    struct TestMarket {
        client: MarketClient,
        ledger: Arc<Ledger>,
        seller: WalletKeyPair,
        buyer: WalletKeyPair,
    }

    fn client_config() -> Config {
        Config {
            request_timeout: Duration::from_secs(5),
            retry: RetryConfig {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(2),
            },
            ..Config::default()
        }
    }

    async fn market() -> TestMarket {
        let mut rng = rand::thread_rng();
        let ledger = Arc::new(Ledger::new(ProgramConfig::default()));
        let access_config = promptlock_access_server::Config {
            service_key: Arc::new(ServiceKey::generate(&mut rng).unwrap()),
            program_id: PROGRAM_ID,
            max_auth_proof_age: Duration::from_secs(60),
            logging: Default::default(),
        };
        let access = AccessServer::new(
            Arc::new(MemoryAuditStore::new()),
            ledger.clone(),
            access_config,
        );
        let storage = MemoryStorage::new(Default::default());
        let client = MarketClient::new(
            client_config(),
            ledger.clone(),
            Arc::new(storage),
            Arc::new(access),
        );

        let seller = WalletKeyPair::generate(&mut rng);
        let buyer = WalletKeyPair::generate(&mut rng);
        let _ = ledger
            .airdrop(&seller.address(), 10 * LAMPORTS_PER_TOKEN)
            .await
            .unwrap();
        let _ = ledger
            .airdrop(&buyer.address(), 10 * LAMPORTS_PER_TOKEN)
            .await
            .unwrap();

        TestMarket {
            client,
            ledger,
            seller,
            buyer,
        }
    }

    fn course_1() -> ContentId {
        ContentId::new("course_1").unwrap()
    }

    fn open_condition() -> AccessCondition {
        AccessCondition::MinimumBalance { lamports: 0 }
    }

    #[tokio::test]
    async fn course_1_scenario() -> Result<()> {
        let market = market().await;
        let client = &market.client;
        let plaintext = b"Prompt engineering, lesson one".to_vec();

        let published = client
            .publish(&plaintext, course_1(), "Course", LAMPORTS_PER_TOKEN, &market.seller)
            .await?;
        let listing = client.listing(&course_1()).await?.unwrap();
        assert_eq!(listing.price, LAMPORTS_PER_TOKEN);
        assert_eq!(listing.seller, market.seller.address());
        assert_eq!(listing.storage_pointer, published.storage_pointer);

        assert!(!client.has_access(&market.buyer.address(), &course_1()).await?);

        let seller_before = client.balance(&market.seller.address()).await?;
        let treasury_before = client.balance(&PLATFORM_TREASURY).await?;
        let _ = client.buy_content(course_1(), &market.buyer).await?;

        assert_eq!(
            client.balance(&market.seller.address()).await? - seller_before,
            950_000_000
        );
        assert_eq!(
            client.balance(&PLATFORM_TREASURY).await? - treasury_before,
            50_000_000
        );
        assert!(client.has_access(&market.buyer.address(), &course_1()).await?);
        assert_eq!(
            client.open_content(&course_1(), &market.buyer).await?,
            plaintext
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_buyers_cannot_open_content() -> Result<()> {
        let market = market().await;
        let _ = market
            .client
            .publish(b"secret", course_1(), "Course", 1_000, &market.seller)
            .await?;

        let result = market.client.open_content(&course_1(), &market.buyer).await;
        assert!(matches!(result, Err(MarketClientError::AccessDenied)));
        Ok(())
    }

    #[tokio::test]
    async fn second_purchase_is_a_conflict() -> Result<()> {
        let market = market().await;
        let _ = market
            .client
            .publish(b"secret", course_1(), "Course", 1_000, &market.seller)
            .await?;
        let _ = market.client.buy_content(course_1(), &market.buyer).await?;
        let balance = market.ledger.balance(&market.buyer.address()).await?;

        let error = market
            .client
            .buy_content(course_1(), &market.buyer)
            .await
            .unwrap_err();
        assert_eq!(error.category(), ErrorCategory::Conflict);
        assert_eq!(
            market.ledger.balance(&market.buyer.address()).await?,
            balance
        );
        Ok(())
    }

    #[tokio::test]
    async fn opening_unlisted_content_fails() {
        let market = market().await;
        let result = market.client.open_content(&course_1(), &market.buyer).await;
        assert!(matches!(result, Err(MarketClientError::ListingNotFound(_))));
    }

    #[tokio::test]
    async fn decrypt_inverts_encrypt() -> Result<()> {
        let market = market().await;
        let metadata = BundleMetadata::new(course_1(), "Course");
        let bundle = market
            .client
            .encrypt(b"plaintext", open_condition(), metadata, &market.seller)
            .await?;
        assert_ne!(bundle.payload.ciphertext, b"plaintext".to_vec());

        let plaintext = market.client.decrypt(&bundle, &market.buyer).await?;
        assert_eq!(plaintext, b"plaintext");
        Ok(())
    }

    #[tokio::test]
    async fn tampered_payload_fails_integrity() -> Result<()> {
        let market = market().await;
        let metadata = BundleMetadata::new(course_1(), "Course");
        let mut bundle = market
            .client
            .encrypt(b"plaintext", open_condition(), metadata, &market.seller)
            .await?;
        bundle.payload.ciphertext[0] ^= 1;

        let error = market
            .client
            .decrypt(&bundle, &market.buyer)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketClientError::DecryptionIntegrity));
        assert_eq!(error.category(), ErrorCategory::Integrity);
        Ok(())
    }

    struct RefusingWallet(WalletKeyPair);

    #[async_trait]
    impl Wallet for RefusingWallet {
        fn address(&self) -> WalletAddress {
            self.0.address()
        }

        fn verifying_key(&self) -> Vec<u8> {
            self.0.verifying_key()
        }

        async fn sign_message(&self, _message: &[u8]) -> std::result::Result<Vec<u8>, WalletError> {
            Err(WalletError::Refused)
        }
    }

    #[tokio::test]
    async fn refused_signatures_are_not_retried() {
        let market = market().await;
        let wallet = RefusingWallet(WalletKeyPair::generate(&mut rand::thread_rng()));
        let metadata = BundleMetadata::new(course_1(), "Course");

        let error = market
            .client
            .encrypt(b"plaintext", open_condition(), metadata, &wallet)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketClientError::WalletRefused));
        assert!(!error.category().is_retryable());

        let error = market
            .client
            .buy_content(course_1(), &wallet)
            .await
            .unwrap_err();
        assert!(matches!(error, MarketClientError::WalletRefused));
    }

    #[derive(Default)]
    struct OfflineService(AtomicU32);

    #[async_trait]
    impl AccessControlService for OfflineService {
        async fn lock(
            &self,
            _request: LockRequest,
        ) -> std::result::Result<LockResponse, AccessControlError> {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
            Err(AccessControlError::Unavailable("connection refused".into()))
        }

        async fn unlock(
            &self,
            _request: UnlockRequest,
        ) -> std::result::Result<UnlockResponse, AccessControlError> {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
            Err(AccessControlError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn unreachable_service_fails_encryption() {
        let ledger = Arc::new(Ledger::new(ProgramConfig::default()));
        let service = Arc::new(OfflineService::default());
        let client = MarketClient::new(
            client_config(),
            ledger,
            Arc::new(MemoryStorage::new(Default::default())),
            service.clone(),
        );
        let wallet = WalletKeyPair::generate(&mut rand::thread_rng());

        let error = client
            .encrypt(
                b"plaintext",
                open_condition(),
                BundleMetadata::new(course_1(), "Course"),
                &wallet,
            )
            .await
            .unwrap_err();
        assert!(matches!(error, MarketClientError::EncryptionFailed(_)));
        assert!(error.category().is_retryable());
        assert_eq!(service.0.load(Ordering::SeqCst), 3);
    }

    /// Confirms the first purchase it sees, then reports the ledger as
    /// unreachable to the caller.
    struct DroppedResponseLedger {
        inner: Arc<Ledger>,
        dropped: AtomicU32,
    }

    #[async_trait]
    impl LedgerRpc for DroppedResponseLedger {
        async fn submit_transaction(
            &self,
            transaction: SignedTransaction,
        ) -> std::result::Result<TransactionReceipt, LedgerError> {
            let is_purchase = matches!(transaction.instruction, Instruction::BuyContent { .. });
            let receipt = self.inner.submit_transaction(transaction).await?;
            if is_purchase && self.dropped.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(LedgerError::Unavailable("response lost".into()));
            }
            Ok(receipt)
        }

        async fn get_account(
            &self,
            address: &AccountAddress,
        ) -> std::result::Result<Option<AccountData>, LedgerError> {
            self.inner.get_account(address).await
        }

        async fn balance(&self, wallet: &WalletAddress) -> std::result::Result<u64, LedgerError> {
            self.inner.balance(wallet).await
        }

        async fn events_since(
            &self,
            slot: u64,
        ) -> std::result::Result<Vec<LedgerEvent>, LedgerError> {
            self.inner.events_since(slot).await
        }
    }

    #[tokio::test]
    async fn purchase_confirmed_before_a_lost_response_succeeds() -> Result<()> {
        let market = market().await;
        let _ = market
            .client
            .publish(b"secret", course_1(), "Course", 1_000, &market.seller)
            .await?;

        let lossy = Arc::new(DroppedResponseLedger {
            inner: market.ledger.clone(),
            dropped: AtomicU32::new(0),
        });
        let client = MarketClient::new(
            client_config(),
            lossy.clone(),
            market.client.storage.clone(),
            market.client.access.clone(),
        );
        let balance = market.ledger.balance(&market.buyer.address()).await?;

        let receipt = client.buy_content(course_1(), &market.buyer).await?;
        assert_eq!(lossy.dropped.load(Ordering::SeqCst), 1);
        assert!(matches!(
            receipt.event,
            MarketEvent::ContentPurchased { ref buyer, .. } if *buyer == market.buyer.address()
        ));
        assert_eq!(market.ledger.events_since(receipt.slot - 1).await?[0].signature, receipt.signature);

        // Paid once.
        assert_eq!(
            market.ledger.balance(&market.buyer.address()).await?,
            balance - 1_000
        );
        assert!(client.has_access(&market.buyer.address(), &course_1()).await?);

        // A fresh purchase of owned content is still a conflict.
        let error = client
            .buy_content(course_1(), &market.buyer)
            .await
            .unwrap_err();
        assert_eq!(error.category(), ErrorCategory::Conflict);
        Ok(())
    }
}
