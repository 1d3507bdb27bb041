//! secp256k1 wallet keys and signature checks.

use crate::{
    crypto::CryptoError,
    services::wallet::{Wallet, WalletError},
    types::identity::WalletAddress,
};
use async_trait::async_trait;
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use std::fmt::{Debug, Formatter};

/// Derive the wallet address owned by a SEC1-encoded verifying key.
///
/// Rejects bytes that are not a point on the curve, so a valid address always
/// has a usable key behind it.
pub fn wallet_address(verifying_key: &[u8]) -> Result<WalletAddress, CryptoError> {
    let key =
        VerifyingKey::from_sec1_bytes(verifying_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    Ok(address_of(&key))
}

fn address_of(key: &VerifyingKey) -> WalletAddress {
    let digest: [u8; 32] = Sha3_256::new()
        .chain_update(b"PromptLock wallet address")
        .chain_update(key.to_encoded_point(true).as_bytes())
        .finalize()
        .into();
    WalletAddress::from_bytes(digest)
}

pub fn verify_wallet_signature(
    verifying_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let key =
        VerifyingKey::from_sec1_bytes(verifying_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature = Signature::from_slice(signature).map_err(|_| CryptoError::VerificationFailed)?;
    key.verify(message, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// A wallet whose signing key lives in this process. Signs without asking.
#[derive(Clone)]
pub struct WalletKeyPair {
    signing_key: SigningKey,
    address: WalletAddress,
}

impl Debug for WalletKeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletKeyPair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl WalletKeyPair {
    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    /// Load a key from its 32-byte scalar encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }
}

#[async_trait]
impl Wallet for WalletKeyPair {
    fn address(&self) -> WalletAddress {
        self.address
    }

    fn verifying_key(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
        Ok(self.sign(message))
    }
}
