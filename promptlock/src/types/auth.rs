//! Wallet authentication proofs.
//!
//! An [`AuthProof`] shows that the holder of a wallet key signed a fresh
//! statement. The access-control service uses it to learn who is asking.

use crate::{
    crypto::{verify_wallet_signature, wallet_address},
    services::wallet::{Wallet, WalletError},
    types::identity::WalletAddress,
    PromptLockError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProof {
    pub address: WalletAddress,
    /// SEC1-compressed secp256k1 verifying key.
    pub verifying_key: Vec<u8>,
    pub issued_at: OffsetDateTime,
    pub nonce: [u8; 16],
    pub signature: Vec<u8>,
}

impl AuthProof {
    /// Ask `wallet` to sign a fresh authentication statement.
    pub async fn request(wallet: &dyn Wallet) -> Result<Self, WalletError> {
        let nonce: [u8; 16] = rand::random();
        let address = wallet.address();
        let issued_at = OffsetDateTime::now_utc();
        let signature = wallet
            .sign_message(&Self::statement(&address, issued_at, &nonce))
            .await?;

        Ok(Self {
            address,
            verifying_key: wallet.verifying_key(),
            issued_at,
            nonce,
            signature,
        })
    }

    /// The message a wallet signs to produce a proof.
    pub fn statement(address: &WalletAddress, issued_at: OffsetDateTime, nonce: &[u8]) -> Vec<u8> {
        format!(
            "PromptLock requests proof of ownership of {address}.\nIssued at: {}\nNonce: {}",
            issued_at.unix_timestamp(),
            hex::encode(nonce)
        )
        .into_bytes()
    }

    /// Check that the signature is valid, that the claimed address belongs to
    /// the verifying key, and that the proof is no older than `max_age`.
    pub fn verify(&self, now: OffsetDateTime, max_age: Duration) -> Result<(), PromptLockError> {
        if wallet_address(&self.verifying_key)? != self.address {
            return Err(PromptLockError::AuthProofAddressMismatch);
        }

        let statement = Self::statement(&self.address, self.issued_at, &self.nonce);
        verify_wallet_signature(&self.verifying_key, &statement, &self.signature)
            .map_err(|_| PromptLockError::InvalidAuthProof)?;

        // Allow a little clock skew in the other direction.
        let skew = time::Duration::seconds(30);
        if self.issued_at > now + skew {
            return Err(PromptLockError::AuthProofFromFuture);
        }
        if now - self.issued_at > max_age {
            return Err(PromptLockError::AuthProofExpired);
        }
        Ok(())
    }
}
