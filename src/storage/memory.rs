use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::types::{BlobKey, ImageUrl};
use crate::storage::{BlobStore, StorageError, StorageResult};

/// Process-local blob store. Objects live as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: Mutex<HashMap<BlobKey, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when an object is stored under `key`.
    pub fn contains(&self, key: &BlobKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BlobKey, Vec<u8>>> {
        // A poisoned map is still structurally valid.
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn write(&self, key: &BlobKey, bytes: Vec<u8>) -> StorageResult<ImageUrl> {
        let url = self.public_url(key)?;
        self.lock().insert(key.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
        match self.lock().remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(key.clone())),
        }
    }

    async fn read(&self, key: &BlobKey) -> StorageResult<Vec<u8>> {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.clone()))
    }

    fn public_url(&self, key: &BlobKey) -> StorageResult<ImageUrl> {
        Ok(ImageUrl::for_key(&self.base_url, key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn overwrites_existing_keys() {
        let store = MemoryBlobStore::new("memory://bucket");
        let key = BlobKey::new("cat.png").unwrap();

        store.write(&key, vec![1]).await.unwrap();
        let url = store.write(&key, vec![2, 3]).await.unwrap();

        assert_eq!(url, "memory://bucket/cat.png");
        assert_eq!(store.len(), 1);
        assert_eq!(store.read(&key).await.unwrap(), vec![2, 3]);
    }

    #[actix_web::test]
    async fn delete_of_missing_object_fails() {
        let store = MemoryBlobStore::new("memory://bucket");
        let key = BlobKey::new("missing.png").unwrap();

        let err = store.delete(&key).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(k) if k == key));
    }
}
