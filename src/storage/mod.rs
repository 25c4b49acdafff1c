//! Blob storage backends for product images.
//!
//! A [`BlobStore`] holds objects addressed by [`BlobKey`] and hands out the
//! public URL each object is served from. The URL is always
//! `<bucket-base-url>/<key>`, which lets callers recover the key from a stored
//! URL without asking the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::types::{BlobKey, ImageUrl, TypeConstraintError};
use crate::models::config::{ServerConfig, StorageBackend};

pub mod fs;
pub mod gcs;
pub mod memory;

pub use fs::FsBlobStore;
pub use gcs::GcsBlobStore;
pub use memory::MemoryBlobStore;

/// Errors raised by blob store backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The addressed object does not exist.
    #[error("object `{0}` not found")]
    NotFound(BlobKey),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The remote store answered with a non-success status.
    #[error("storage responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid object url: {0}")]
    InvalidUrl(#[from] TypeConstraintError),
    #[error("invalid storage endpoint: {0}")]
    Endpoint(String),
    #[error("storage configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Convenient alias for results returned from blob stores.
pub type StorageResult<T> = Result<T, StorageError>;

/// A bucket of named objects with publicly addressable URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object, and return
    /// the object's public URL.
    async fn write(&self, key: &BlobKey, bytes: Vec<u8>) -> StorageResult<ImageUrl>;

    /// Remove the object stored under `key`.
    async fn delete(&self, key: &BlobKey) -> StorageResult<()>;

    /// Fetch the object stored under `key`.
    async fn read(&self, key: &BlobKey) -> StorageResult<Vec<u8>>;

    /// Public URL of `key`, whether or not the object exists.
    fn public_url(&self, key: &BlobKey) -> StorageResult<ImageUrl>;
}

/// Construct the blob store selected by `config.storage_backend`.
pub fn build_blob_store(config: &ServerConfig) -> StorageResult<Arc<dyn BlobStore>> {
    let base_url = config.bucket_base_url()?;

    let store: Arc<dyn BlobStore> = match config.storage_backend {
        StorageBackend::Gcs => Arc::new(GcsBlobStore::new(
            config.gcs_bucket()?,
            config.gcloud_access_token.clone(),
            base_url,
            Duration::from_secs(config.storage_timeout_secs),
        )?),
        StorageBackend::Fs => Arc::new(FsBlobStore::new(&config.blob_dir, base_url)),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new(base_url)),
    };

    Ok(store)
}
