//! Low-level pieces shared by the key types in this module.

use crate::ErrorCategory;
use chacha20poly1305::{
    aead::{Aead, Payload},
    ChaCha20Poly1305, KeyInit, Nonce,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that arise in the cryptography module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Key derivation failed")]
    KeyDerivationFailed,
    #[error("RNG failed")]
    RandomNumberGeneratorFailed,
    #[error("Conversion error")]
    ConversionError,
    #[error("Key material has the wrong length")]
    InvalidKeyLength,
    #[error("Public key is not a valid SEC1 point")]
    InvalidPublicKey,
    #[error("Signature did not verify")]
    VerificationFailed,
    #[error("Locked secret does not match its lock hash")]
    LockHashMismatch,
    #[error("Locked secret was not created under the given condition")]
    ConditionMismatch,
}

impl CryptoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CryptoError::DecryptionFailed
            | CryptoError::LockHashMismatch
            | CryptoError::ConditionMismatch => ErrorCategory::Integrity,
            CryptoError::VerificationFailed | CryptoError::InvalidPublicKey => {
                ErrorCategory::Authorization
            }
            _ => ErrorCategory::Internal,
        }
    }
}

/// Context bytes authenticated alongside a ciphertext, or mixed into a key
/// derivation. Always starts with a fixed domain tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub(super) struct AssociatedData(Vec<u8>);

impl AssociatedData {
    const DOMAIN: &'static [u8] = b"PromptLock/v1";

    pub(super) fn new() -> Self {
        Self(Self::DOMAIN.to_vec())
    }

    pub(super) fn with_str(self, label: &str) -> Self {
        self.with_bytes(label.bytes())
    }

    /// Append a length-prefixed field. Adjacent fields can't bleed into one
    /// another.
    pub(super) fn with_field(self, field: &[u8]) -> Self {
        self.with_bytes((field.len() as u64).to_be_bytes())
            .with_bytes(field.iter().copied())
    }

    pub(super) fn with_bytes(mut self, bytes: impl IntoIterator<Item = u8>) -> Self {
        self.0.extend(bytes);
        self
    }

    pub(super) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte ChaCha20-Poly1305 key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub(super) struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    pub(super) fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Result<Self, CryptoError> {
        Ok(Self(random_array(rng)?))
    }

    pub(super) fn from_material(material: [u8; 32]) -> Self {
        Self(material)
    }

    /// Raw key bytes. Only for use as KDF input.
    pub(super) fn material(&self) -> &[u8; 32] {
        &self.0
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(&self.0.into())
    }
}

/// ChaCha20-Poly1305 ciphertext of a `T`, carrying the associated data it
/// was sealed with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(super) struct Encrypted<T> {
    ciphertext: Vec<u8>,
    pub(super) associated_data: AssociatedData,
    nonce: [u8; 12],
    #[serde(skip)]
    plaintext_type: PhantomData<T>,
}

impl<T> Encrypted<T>
where
    T: Into<Vec<u8>> + TryFrom<Vec<u8>, Error = CryptoError>,
{
    pub(super) fn encrypt(
        rng: &mut (impl CryptoRng + RngCore),
        key: &EncryptionKey,
        object: T,
        associated_data: &AssociatedData,
    ) -> Result<Self, CryptoError> {
        let nonce = random_array(rng)?;
        let mut plaintext: Vec<u8> = object.into();
        let ciphertext = key.cipher().encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &plaintext,
                aad: associated_data.as_bytes(),
            },
        );
        plaintext.zeroize();

        Ok(Self {
            ciphertext: ciphertext.map_err(|_| CryptoError::EncryptionFailed)?,
            associated_data: associated_data.clone(),
            nonce,
            plaintext_type: PhantomData,
        })
    }

    /// Fails with [`CryptoError::DecryptionFailed`] on a bad key, tag, or
    /// associated data, and with [`CryptoError::ConversionError`] if the
    /// plaintext isn't a valid `T`.
    pub(super) fn decrypt(&self, key: &EncryptionKey) -> Result<T, CryptoError> {
        let plaintext = key
            .cipher()
            .decrypt(
                Nonce::from_slice(&self.nonce),
                Payload {
                    msg: &self.ciphertext,
                    aad: self.associated_data.as_bytes(),
                },
            )
            .map_err(|_| CryptoError::DecryptionFailed)?;
        T::try_from(plaintext)
    }
}

/// Secret bytes together with the context they belong to. The context is
/// encrypted with the material, so a decrypted secret can be checked against
/// the context it is being opened for.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub(super) struct BoundSecret {
    material: Vec<u8>,
    #[zeroize(skip)]
    context: AssociatedData,
}

impl BoundSecret {
    pub(super) fn new(material: &[u8], context: &AssociatedData) -> Self {
        Self {
            material: material.to_vec(),
            context: context.clone(),
        }
    }

    pub(super) fn material(&self) -> &[u8] {
        &self.material
    }

    pub(super) fn context(&self) -> &AssociatedData {
        &self.context
    }
}

/// Encoded as `len(material) as u32 || material || context`.
impl From<BoundSecret> for Vec<u8> {
    fn from(secret: BoundSecret) -> Self {
        let mut bytes = Vec::with_capacity(4 + secret.material.len() + secret.context.0.len());
        bytes.extend((secret.material.len() as u32).to_be_bytes());
        bytes.extend(&secret.material);
        bytes.extend(&secret.context.0);
        bytes
    }
}

impl TryFrom<Vec<u8>> for BoundSecret {
    type Error = CryptoError;

    fn try_from(mut bytes: Vec<u8>) -> Result<Self, Self::Error> {
        let parsed = (|| {
            let len: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
            let rest = &bytes[4..];
            let material_len = u32::from_be_bytes(len) as usize;
            let material = rest.get(..material_len)?;
            let context = rest.get(material_len..)?;
            Some(BoundSecret {
                material: material.to_vec(),
                context: AssociatedData(context.to_vec()),
            })
        })();
        bytes.zeroize();
        parsed.ok_or(CryptoError::ConversionError)
    }
}

/// Fill a fixed-size array with randomness.
pub(super) fn random_array<const N: usize>(
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<[u8; N], CryptoError> {
    let mut bytes = [0u8; N];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|_| CryptoError::RandomNumberGeneratorFailed)?;
    Ok(bytes)
}
