//! The self-describing record a seller places in durable storage.

use crate::{
    constants::{APP_NAME, BUNDLE_CONTENT_TYPE, BUNDLE_VERSION},
    infrastructure::encoding::{base64_array, base64_bytes},
    types::{condition::AccessCondition, content::ContentId},
    PromptLockError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBundle {
    pub payload: EncryptedPayload,
    pub lock: KeyLock,
    pub metadata: BundleMetadata,
}

impl EncryptedBundle {
    pub fn to_bytes(&self) -> Result<Vec<u8>, PromptLockError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PromptLockError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// AES-256-GCM output. The tag is the trailing 16 bytes of `ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "base64_array")]
    pub iv: [u8; 12],
}

/// The content key as locked by the access-control service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLock {
    pub locked_key: LockedSecret,
    pub lock_hash: LockHash,
    pub condition: AccessCondition,
}

/// Ciphertext produced by the access-control service. Opaque to everyone
/// else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedSecret(#[serde(with = "base64_bytes")] pub Vec<u8>);

/// Hex-encoded SHA3-256 fingerprint of a locked secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockHash(pub String);

impl Display for LockHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields supplied by the seller. Not security relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub content_id: ContentId,
    pub title: String,
    pub description: Option<String>,
    pub uploaded_at: OffsetDateTime,
    pub content_type: String,
    pub version: String,
    pub app_name: String,
}

impl BundleMetadata {
    pub fn new(content_id: ContentId, title: impl Into<String>) -> Self {
        Self {
            content_id,
            title: title.into(),
            description: None,
            uploaded_at: OffsetDateTime::now_utc(),
            content_type: BUNDLE_CONTENT_TYPE.to_string(),
            version: BUNDLE_VERSION.to_string(),
            app_name: APP_NAME.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}
