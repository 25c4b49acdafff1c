use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::types::{BlobKey, ImageUrl};
use crate::storage::{BlobStore, StorageError, StorageResult};

/// Directory-backed bucket. Each object is one file named after its key.
///
/// The application serves the directory under `/blobs`, so with the default
/// base URL every returned URL is fetchable from the service itself.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.into(),
        }
    }

    /// Directory holding the objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &BlobKey) -> PathBuf {
        // Keys are single path segments, so the join stays inside `root`.
        self.root.join(key.as_str())
    }

    fn map_missing(key: &BlobKey, err: std::io::Error) -> StorageError {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound(key.clone())
        } else {
            StorageError::Io(err)
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, key: &BlobKey, bytes: Vec<u8>) -> StorageResult<ImageUrl> {
        let url = self.public_url(key)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.object_path(key), bytes).await?;
        Ok(url)
    }

    async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
        tokio::fs::remove_file(self.object_path(key))
            .await
            .map_err(|e| Self::map_missing(key, e))
    }

    async fn read(&self, key: &BlobKey) -> StorageResult<Vec<u8>> {
        tokio::fs::read(self.object_path(key))
            .await
            .map_err(|e| Self::map_missing(key, e))
    }

    fn public_url(&self, key: &BlobKey) -> StorageResult<ImageUrl> {
        Ok(ImageUrl::for_key(&self.base_url, key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn writes_reads_and_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("bucket"), "http://localhost:3000/blobs");
        let key = BlobKey::new("cat.png").unwrap();

        let url = store.write(&key, vec![0x89, 0x50]).await.unwrap();
        assert_eq!(url, "http://localhost:3000/blobs/cat.png");
        assert!(dir.path().join("bucket").join("cat.png").exists());
        assert_eq!(store.read(&key).await.unwrap(), vec![0x89, 0x50]);

        store.delete(&key).await.unwrap();
        assert!(matches!(
            store.read(&key).await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[actix_web::test]
    async fn deleting_missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:3000/blobs");
        let key = BlobKey::new("ghost.png").unwrap();

        assert!(matches!(
            store.delete(&key).await.unwrap_err(),
            StorageError::NotFound(k) if k == key
        ));
    }
}
