use crate::{
    constants::{MAX_CONTENT_ID_LEN, MAX_STORAGE_POINTER_LEN, MAX_TITLE_LEN},
    PromptLockError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Caller-chosen identifier of a piece of content.
///
/// Non-empty and at most [`MAX_CONTENT_ID_LEN`] bytes so that it fits a single
/// address derivation seed. Validated on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Result<Self, PromptLockError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PromptLockError::EmptyContentId);
        }
        if id.len() > MAX_CONTENT_ID_LEN {
            return Err(PromptLockError::ContentIdTooLong {
                len: id.len(),
                max: MAX_CONTENT_ID_LEN,
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for ContentId {
    type Error = PromptLockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ContentId {
    type Error = PromptLockError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content-addressed identifier returned by durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoragePointer(String);

impl StoragePointer {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self(pointer.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StoragePointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds checks for the free-form fields stored in a listing record.
pub fn validate_listing_fields(
    storage_pointer: &StoragePointer,
    title: &str,
) -> Result<(), PromptLockError> {
    check_len("storage pointer", storage_pointer.as_str(), MAX_STORAGE_POINTER_LEN)?;
    check_len("title", title, MAX_TITLE_LEN)
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), PromptLockError> {
    if value.len() > max {
        return Err(PromptLockError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn content_id_length_is_bounded() {
        assert!(ContentId::new("course_1").is_ok());
        assert!(ContentId::new("x".repeat(MAX_CONTENT_ID_LEN)).is_ok());

        assert!(matches!(
            ContentId::new("x".repeat(MAX_CONTENT_ID_LEN + 1)),
            Err(PromptLockError::ContentIdTooLong { len: 33, max: 32 })
        ));
        assert!(matches!(
            ContentId::new(""),
            Err(PromptLockError::EmptyContentId)
        ));
    }

    #[test]
    fn content_id_bound_counts_bytes_not_chars() {
        // 11 three-byte characters
        let id = "語".repeat(11);
        assert_eq!(id.chars().count(), 11);
        assert!(ContentId::new(id).is_err());
    }

    #[test]
    fn deserialization_revalidates_content_ids() {
        let too_long = format!("\"{}\"", "a".repeat(40));
        assert!(serde_json::from_str::<ContentId>(&too_long).is_err());

        let id: ContentId = serde_json::from_str("\"course_1\"").unwrap();
        assert_eq!(id.as_str(), "course_1");
    }

    #[test]
    fn oversized_listing_fields_are_rejected() {
        let pointer = StoragePointer::new("p".repeat(MAX_STORAGE_POINTER_LEN + 1));
        assert!(matches!(
            validate_listing_fields(&pointer, "title"),
            Err(PromptLockError::FieldTooLong {
                field: "storage pointer",
                ..
            })
        ));

        let pointer = StoragePointer::new("pointer");
        assert!(validate_listing_fields(&pointer, &"t".repeat(MAX_TITLE_LEN + 1)).is_err());
        assert!(validate_listing_fields(&pointer, "A fine title").is_ok());
    }
}
