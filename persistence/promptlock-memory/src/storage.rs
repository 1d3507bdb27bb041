use crate::Config;
use async_trait::async_trait;
use promptlock::{
    services::storage::{content_address, verify_content_address, DurableStorage, StorageError},
    types::content::StoragePointer,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// Content-addressed object storage held in a hashmap. Objects are immutable
/// once stored.
#[derive(Debug)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<StoragePointer, Vec<u8>>>,
    max_object_size: usize,
}

impl MemoryStorage {
    pub fn new(config: Config) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            max_object_size: config.max_object_size,
        }
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn put(&self, bytes: Vec<u8>) -> Result<StoragePointer, StorageError> {
        if bytes.len() > self.max_object_size {
            return Err(StorageError::TooLarge {
                size: bytes.len(),
                max: self.max_object_size,
            });
        }

        let pointer = content_address(&bytes);
        let mut objects = self.objects.write().await;
        if !objects.contains_key(&pointer) {
            info!("Stored object {} ({} bytes)", pointer, bytes.len());
            let _ = objects.insert(pointer.clone(), bytes);
        }
        Ok(pointer)
    }

    async fn get(&self, pointer: &StoragePointer) -> Result<Vec<u8>, StorageError> {
        let bytes = self
            .objects
            .read()
            .await
            .get(pointer)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(pointer.clone()))?;
        verify_content_address(pointer, &bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_exact_bytes() -> Result<(), StorageError> {
        let storage = MemoryStorage::new(Config::default());
        let pointer = storage.put(b"bundle bytes".to_vec()).await?;

        assert_eq!(storage.get(&pointer).await?, b"bundle bytes".to_vec());
        assert_eq!(pointer, content_address(b"bundle bytes"));
        Ok(())
    }

    #[tokio::test]
    async fn same_bytes_same_pointer() -> Result<(), StorageError> {
        let storage = MemoryStorage::new(Config::default());
        let first = storage.put(vec![1, 2, 3]).await?;
        let second = storage.put(vec![1, 2, 3]).await?;
        let other = storage.put(vec![3, 2, 1]).await?;

        assert_eq!(first, second);
        assert_ne!(first, other);
        Ok(())
    }

    #[tokio::test]
    async fn missing_and_oversized_objects() {
        let storage = MemoryStorage::new(Config { max_object_size: 4 });

        let missing = StoragePointer::new("nothing-here");
        assert_eq!(
            storage.get(&missing).await,
            Err(StorageError::NotFound(missing))
        );
        assert_eq!(
            storage.put(vec![0; 5]).await,
            Err(StorageError::TooLarge { size: 5, max: 4 })
        );
    }
}
