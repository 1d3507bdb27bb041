//! The access-control service's long-lived key.
//!
//! Secrets are never locked under the [`ServiceKey`] directly. Each lock uses
//! a key derived from the service key and the digest of the access condition,
//! and the condition bytes are authenticated as associated data. A locked
//! secret therefore cannot be opened under any condition other than the one it
//! was locked with.

use crate::{
    crypto::generic::{AssociatedData, BoundSecret, CryptoError, Encrypted, EncryptionKey},
    types::{
        bundle::{LockHash, LockedSecret},
        condition::AccessCondition,
        operations::SecretMaterial,
    },
    PromptLockError,
};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use std::{
    fmt::{Debug, Formatter},
    path::Path,
};
use tracing::error;

pub struct ServiceKey(EncryptionKey);

impl Debug for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServiceKey(REDACTED)")
    }
}

impl ServiceKey {
    pub const LENGTH: usize = 32;

    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Result<Self, CryptoError> {
        Ok(Self(EncryptionKey::generate(rng)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let material: [u8; Self::LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self(EncryptionKey::from_material(material)))
    }

    /// Read raw key bytes from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, PromptLockError> {
        let bytes = std::fs::read(&path)
            .map_err(|e| PromptLockError::FileIo(e, path.as_ref().to_path_buf()))?;
        Ok(Self::from_bytes(&bytes)?)
    }

    /// Lock `secret` so that it can only be opened under `condition`.
    pub fn lock(
        &self,
        rng: &mut (impl CryptoRng + RngCore),
        secret: &SecretMaterial,
        condition: &AccessCondition,
    ) -> Result<(LockedSecret, LockHash), PromptLockError> {
        let associated_data = Self::associated_data(condition)?;
        let key = self.derive_key(condition)?;

        let secret = BoundSecret::new(secret.as_bytes(), &associated_data);
        let encrypted = Encrypted::encrypt(rng, &key, secret, &associated_data)?;
        let locked = LockedSecret(serde_json::to_vec(&encrypted)?);
        let lock_hash = lock_hash(&locked);

        Ok((locked, lock_hash))
    }

    /// Open a locked secret. The caller is responsible for checking that the
    /// requester satisfies `condition` before calling this.
    pub fn unlock(
        &self,
        locked: &LockedSecret,
        expected_hash: &LockHash,
        condition: &AccessCondition,
    ) -> Result<SecretMaterial, PromptLockError> {
        if &lock_hash(locked) != expected_hash {
            return Err(CryptoError::LockHashMismatch.into());
        }

        let encrypted: Encrypted<BoundSecret> =
            serde_json::from_slice(&locked.0).map_err(|_| CryptoError::ConversionError)?;
        let associated_data = Self::associated_data(condition)?;
        if encrypted.associated_data != associated_data {
            return Err(CryptoError::ConditionMismatch.into());
        }

        let secret = encrypted.decrypt(&self.derive_key(condition)?)?;
        if secret.context() != &associated_data {
            return Err(CryptoError::ConditionMismatch.into());
        }
        Ok(SecretMaterial::new(secret.material().to_vec()))
    }

    fn associated_data(condition: &AccessCondition) -> Result<AssociatedData, PromptLockError> {
        Ok(AssociatedData::new()
            .with_str("locked content key")
            .with_field(&condition.canonical_bytes()?))
    }

    fn derive_key(&self, condition: &AccessCondition) -> Result<EncryptionKey, PromptLockError> {
        let context = AssociatedData::new()
            .with_str("per-condition lock key")
            .with_bytes(condition.digest()?);
        let mut key_material = [0u8; 32];

        // Output length is fixed at 32, the only documented cause of failure is
        // a length mismatch.
        Hkdf::<Sha3_256>::new(None, self.0.material())
            .expand(context.as_bytes(), &mut key_material)
            .map_err(|e| {
                error!("HKDF failed unexpectedly. {:?}", e);
                CryptoError::KeyDerivationFailed
            })?;

        Ok(EncryptionKey::from_material(key_material))
    }
}

/// Hex-encoded SHA3-256 of the locked bytes.
pub(crate) fn lock_hash(locked: &LockedSecret) -> LockHash {
    LockHash(hex::encode(Sha3_256::digest(&locked.0)))
}
