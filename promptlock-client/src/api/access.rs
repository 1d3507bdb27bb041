use crate::{MarketClient, MarketClientError, Result};
use promptlock::{
    crypto::{listing_address, receipt_address},
    services::wallet::Wallet,
    types::{
        bundle::EncryptedBundle, content::ContentId, identity::WalletAddress, ledger::Listing,
    },
};
use tracing::info;

impl MarketClient {
    pub(crate) async fn handle_has_access(
        &self,
        buyer: &WalletAddress,
        content_id: &ContentId,
    ) -> Result<bool> {
        let address = receipt_address(&self.config().program_id, buyer, content_id);
        self.call("account_exists", || self.ledger.account_exists(&address))
            .await
    }

    pub(crate) async fn handle_listing(&self, content_id: &ContentId) -> Result<Option<Listing>> {
        let address = listing_address(&self.config().program_id, content_id);
        let account = self
            .call("get_account", || self.ledger.get_account(&address))
            .await?;
        Ok(account.and_then(|data| data.as_listing().cloned()))
    }

    pub(crate) async fn handle_open_content(
        &self,
        content_id: &ContentId,
        wallet: &dyn Wallet,
    ) -> Result<Vec<u8>> {
        let listing = self
            .handle_listing(content_id)
            .await?
            .ok_or_else(|| MarketClientError::ListingNotFound(content_id.clone()))?;
        info!("Fetching bundle from {}", listing.storage_pointer);

        let bytes = self
            .call("storage get", || self.storage.get(&listing.storage_pointer))
            .await?;
        let bundle = EncryptedBundle::from_bytes(&bytes)?;
        if &bundle.metadata.content_id != content_id {
            return Err(MarketClientError::BundleMismatch {
                expected: content_id.clone(),
                found: bundle.metadata.content_id,
            });
        }

        self.handle_decrypt(&bundle, wallet).await
    }
}
