use crate::{MarketClient, MarketClientError, Result};
use promptlock::{
    crypto::{ContentKey, CryptoError},
    services::wallet::Wallet,
    types::{auth::AuthProof, bundle::EncryptedBundle, operations::UnlockRequest},
};

impl MarketClient {
    pub(crate) async fn handle_decrypt(
        &self,
        bundle: &EncryptedBundle,
        wallet: &dyn Wallet,
    ) -> Result<Vec<u8>> {
        let request = UnlockRequest {
            locked_secret: bundle.lock.locked_key.clone(),
            lock_hash: bundle.lock.lock_hash.clone(),
            condition: bundle.lock.condition.clone(),
            auth_proof: AuthProof::request(wallet).await?,
        };
        let unlocked = self
            .call("unlock", || self.access.unlock(request.clone()))
            .await?;

        let content_key = ContentKey::from_secret(&unlocked.secret)?;
        content_key
            .decrypt(&bundle.payload)
            .map_err(|e| match e {
                CryptoError::DecryptionFailed => MarketClientError::DecryptionIntegrity,
                other => other.into(),
            })
    }
}
