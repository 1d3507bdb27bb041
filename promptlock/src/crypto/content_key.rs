use crate::{
    crypto::generic::{random_array, CryptoError},
    types::{bundle::EncryptedPayload, operations::SecretMaterial},
};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{CryptoRng, RngCore};
use std::fmt::{Debug, Formatter};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 256-bit AES-GCM key for one piece of content.
///
/// Generated fresh for every publication. Only this key, never the payload,
/// is sent to the access-control service.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey([u8; 32]);

impl Debug for ContentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentKey(REDACTED)")
    }
}

impl ContentKey {
    pub const LENGTH: usize = 32;
    const IV_LENGTH: usize = 12;

    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Result<Self, CryptoError> {
        Ok(Self(random_array(rng)?))
    }

    pub fn from_secret(secret: &SecretMaterial) -> Result<Self, CryptoError> {
        let bytes: [u8; Self::LENGTH] = secret
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self(bytes))
    }

    /// Copy the key out for locking.
    pub fn to_secret(&self) -> SecretMaterial {
        SecretMaterial::new(self.0.to_vec())
    }

    /// Encrypt `plaintext` under a fresh random IV.
    pub fn encrypt(
        &self,
        rng: &mut (impl CryptoRng + RngCore),
        plaintext: &[u8],
    ) -> Result<EncryptedPayload, CryptoError> {
        let iv: [u8; Self::IV_LENGTH] = random_array(rng)?;
        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(EncryptedPayload { ciphertext, iv })
    }

    /// Decrypt a payload. Fails with [`CryptoError::DecryptionFailed`] if the
    /// tag does not verify; corrupted output is never returned.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<Vec<u8>, CryptoError> {
        self.cipher()
            .decrypt(Nonce::from_slice(&payload.iv), payload.ciphertext.as_ref())
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(&self.0.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashSet;

    fn random_plaintext(rng: &mut impl Rng, len: usize) -> Vec<u8> {
        std::iter::repeat_with(|| rng.gen()).take(len).collect()
    }

    #[test]
    fn encryption_decryption_works() -> Result<(), CryptoError> {
        let mut rng = rand::thread_rng();
        for len in [0, 1, 15, 16, 17, 1000] {
            let key = ContentKey::generate(&mut rng)?;
            let plaintext = random_plaintext(&mut rng, len);

            let payload = key.encrypt(&mut rng, &plaintext)?;
            // 16-byte tag
            assert_eq!(payload.ciphertext.len(), len + 16);
            assert_eq!(key.decrypt(&payload)?, plaintext);
        }
        Ok(())
    }

    #[test]
    fn keys_and_ivs_are_fresh() -> Result<(), CryptoError> {
        let mut rng = StdRng::from_entropy();
        let key = ContentKey::generate(&mut rng)?;

        let mut ivs = HashSet::new();
        for _ in 0..500 {
            assert!(ivs.insert(key.encrypt(&mut rng, b"prompt")?.iv));
        }

        let mut keys = HashSet::new();
        for _ in 0..500 {
            assert!(keys.insert(ContentKey::generate(&mut rng)?.0));
        }
        Ok(())
    }

    #[test]
    fn tampering_is_detected() -> Result<(), CryptoError> {
        let mut rng = rand::thread_rng();
        let key = ContentKey::generate(&mut rng)?;
        let payload = key.encrypt(&mut rng, b"a secret prompt")?;

        let mut flipped = payload.clone();
        flipped.ciphertext[0] ^= 1;
        assert_eq!(key.decrypt(&flipped), Err(CryptoError::DecryptionFailed));

        let mut wrong_iv = payload.clone();
        wrong_iv.iv[0] ^= 1;
        assert_eq!(key.decrypt(&wrong_iv), Err(CryptoError::DecryptionFailed));

        let other_key = ContentKey::generate(&mut rng)?;
        assert_eq!(other_key.decrypt(&payload), Err(CryptoError::DecryptionFailed));
        Ok(())
    }

    #[test]
    fn key_round_trips_through_secret_material() -> Result<(), CryptoError> {
        let key = ContentKey::generate(&mut rand::thread_rng())?;
        assert_eq!(ContentKey::from_secret(&key.to_secret())?, key);

        let short = SecretMaterial::new(vec![1; 16]);
        assert_eq!(
            ContentKey::from_secret(&short),
            Err(CryptoError::InvalidKeyLength)
        );
        Ok(())
    }
}
