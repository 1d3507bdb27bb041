use crate::{MarketClient, MarketClientError, Result};
use promptlock::{
    crypto::ContentKey,
    services::wallet::Wallet,
    types::{
        auth::AuthProof,
        bundle::{BundleMetadata, EncryptedBundle, KeyLock},
        condition::AccessCondition,
        operations::LockRequest,
    },
};

impl MarketClient {
    pub(crate) async fn handle_encrypt(
        &self,
        plaintext: &[u8],
        condition: AccessCondition,
        metadata: BundleMetadata,
        wallet: &dyn Wallet,
    ) -> Result<EncryptedBundle> {
        let (content_key, payload) = {
            let mut rng = self.rng.lock().await;
            let content_key = ContentKey::generate(&mut *rng)?;
            let payload = content_key.encrypt(&mut *rng, plaintext)?;
            (content_key, payload)
        };

        let request = LockRequest {
            secret: content_key.to_secret(),
            condition: condition.clone(),
            auth_proof: AuthProof::request(wallet).await?,
        };
        let locked = self
            .call("lock", || self.access.lock(request.clone()))
            .await
            .map_err(|e| MarketClientError::EncryptionFailed(e.to_string()))?;

        Ok(EncryptedBundle {
            payload,
            lock: KeyLock {
                locked_key: locked.locked_secret,
                lock_hash: locked.lock_hash,
                condition,
            },
            metadata,
        })
    }
}
