use crate::{api::PublishedContent, MarketClient, Result};
use promptlock::{
    services::wallet::Wallet,
    types::{
        bundle::BundleMetadata,
        condition::AccessCondition,
        content::{validate_listing_fields, ContentId, StoragePointer},
        transaction::{Instruction, SignedTransaction, TransactionReceipt},
    },
};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

impl MarketClient {
    pub(crate) async fn handle_publish(
        &self,
        plaintext: &[u8],
        content_id: ContentId,
        title: &str,
        price: u64,
        wallet: &dyn Wallet,
    ) -> Result<PublishedContent> {
        let condition = AccessCondition::receipt_exists(self.config().program_id, content_id.clone());
        let defaults = &self.config().metadata;
        let mut metadata = BundleMetadata::new(content_id.clone(), title)
            .with_content_type(defaults.content_type.clone());
        if let Some(description) = &defaults.description {
            metadata = metadata.with_description(description.clone());
        }

        let bundle = self
            .handle_encrypt(plaintext, condition, metadata, wallet)
            .await?;
        let bytes = bundle.to_bytes()?;
        let storage_pointer = self
            .call("storage put", || self.storage.put(bytes.clone()))
            .await?;
        info!("Stored bundle at {}", storage_pointer);

        let receipt = self
            .handle_list_content(content_id, storage_pointer.clone(), title, price, wallet)
            .await?;

        Ok(PublishedContent {
            storage_pointer,
            receipt,
        })
    }

    pub(crate) async fn handle_list_content(
        &self,
        content_id: ContentId,
        storage_pointer: StoragePointer,
        title: &str,
        price: u64,
        wallet: &dyn Wallet,
    ) -> Result<TransactionReceipt> {
        validate_listing_fields(&storage_pointer, title)?;
        let instruction = Instruction::ListContent {
            content_id,
            storage_pointer,
            title: title.to_string(),
            price,
        };
        self.submit(instruction, wallet).await
    }

    /// Sign and submit a transaction. Signing happens once; resubmitting the
    /// same signed transaction after a transient failure can't execute it
    /// twice, since each instruction creates an account that already exists
    /// the second time.
    pub(crate) async fn submit(
        &self,
        instruction: Instruction,
        wallet: &dyn Wallet,
    ) -> Result<TransactionReceipt> {
        let transaction =
            SignedTransaction::sign(wallet, &self.config().program_id, instruction).await?;
        let (result, _) = self.submit_signed(&transaction).await;
        result
    }

    /// Submit an already signed transaction under the retry policy. Also
    /// returns how many times it was sent.
    pub(crate) async fn submit_signed(
        &self,
        transaction: &SignedTransaction,
    ) -> (Result<TransactionReceipt>, u32) {
        let name = transaction.instruction.name();
        let attempts = AtomicU32::new(0);
        let result = self
            .call(name, || {
                let _ = attempts.fetch_add(1, Ordering::SeqCst);
                self.ledger.submit_transaction(transaction.clone())
            })
            .await;

        if let Ok(receipt) = &result {
            info!("{} confirmed in slot {} as {}", name, receipt.slot, receipt.signature);
        }
        (result, attempts.into_inner())
    }
}
