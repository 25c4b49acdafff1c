//! Product image operations.
//!
//! [`ImageAttachmentCoordinator`] keeps one blob object and one
//! `product_images` row in correspondence. Every mutation touches the blob
//! store first and the table second, and nothing is rolled back: a failure in
//! the second step leaves an orphaned object (attach, replace) or rows
//! pointing at a deleted object (detach). Replace never deletes the object it
//! supersedes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::product_image::{NewProductImage, ProductImage};
use crate::domain::types::{ImageUrl, ProductId, ProductImageId};
use crate::forms::product_images::ImageUpload;
use crate::models::config::ImageWritePolicy;
use crate::repository::{ProductImageReader, ProductImageWriter};
use crate::storage::BlobStore;

use super::{ServiceError, ServiceResult};

/// Response body of a successful attach.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttachedImage {
    pub id: ProductImageId,
    #[serde(rename = "imageURL")]
    pub image_url: ImageUrl,
}

/// Async mutex per product id, created on first use and dropped once nobody
/// holds or awaits it.
#[derive(Default)]
struct ProductLocks {
    locks: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

/// Held product locks. Releasing them prunes idle map entries.
struct ProductLockGuard<'a> {
    owner: &'a ProductLocks,
    ids: Vec<ProductId>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl ProductLocks {
    fn map(&self) -> MutexGuard<'_, HashMap<ProductId, Arc<AsyncMutex<()>>>> {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Acquire the locks of `ids` in ascending order.
    async fn acquire(&self, ids: &[ProductId]) -> ProductLockGuard<'_> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut held = ProductLockGuard {
            owner: self,
            ids: Vec::with_capacity(ids.len()),
            guards: Vec::with_capacity(ids.len()),
        };
        for id in ids {
            let lock = Arc::clone(self.map().entry(id).or_default());
            held.ids.push(id);
            held.guards.push(lock.lock_owned().await);
        }
        held
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.map().len()
    }
}

impl Drop for ProductLockGuard<'_> {
    fn drop(&mut self) {
        self.guards.clear();
        let mut map = self.owner.map();
        for id in &self.ids {
            if map.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                map.remove(id);
            }
        }
    }
}

/// Coordinates blob writes/deletes with `product_images` row mutations.
///
/// The repository and blob store are injected at construction and shared by
/// every request for the lifetime of the process.
pub struct ImageAttachmentCoordinator<R, B: ?Sized = dyn BlobStore> {
    repo: R,
    store: Arc<B>,
    locks: Option<ProductLocks>,
}

impl<R, B: BlobStore + ?Sized> ImageAttachmentCoordinator<R, B> {
    pub fn new(repo: R, store: Arc<B>, policy: ImageWritePolicy) -> Self {
        let locks = match policy {
            ImageWritePolicy::Unserialized => None,
            ImageWritePolicy::PerProduct => Some(ProductLocks::default()),
        };
        Self { repo, store, locks }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    async fn lock(&self, ids: &[ProductId]) -> Option<ProductLockGuard<'_>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(ids).await),
            None => None,
        }
    }

    async fn write_blob(&self, upload: ImageUpload) -> ServiceResult<ImageUrl> {
        match self.store.write(&upload.file_name, upload.bytes).await {
            Ok(url) => {
                log::debug!("Stored image `{}` at {url}", upload.file_name);
                Ok(url)
            }
            Err(e) => {
                log::error!("Failed to store image `{}`: {e}", upload.file_name);
                Err(ServiceError::StorageWrite(e.to_string()))
            }
        }
    }
}

impl<R, B> ImageAttachmentCoordinator<R, B>
where
    R: ProductImageReader + ProductImageWriter,
    B: BlobStore + ?Sized,
{
    /// Store the upload, then insert a row referencing it.
    ///
    /// The product reference is not checked. Re-using a file name overwrites
    /// the existing object.
    pub async fn attach(&self, upload: ImageUpload) -> ServiceResult<AttachedImage> {
        let _guards = self.lock(&[upload.product_id]).await;

        let product_id = upload.product_id;
        let image_url = self.write_blob(upload).await?;

        let new_image = NewProductImage {
            product_id,
            image_url: image_url.clone(),
        };

        match self.repo.create_product_image(&new_image) {
            Ok(id) => Ok(AttachedImage { id, image_url }),
            Err(e) => {
                log::error!("Failed to insert image row for product {product_id}: {e}");
                log::warn!("Object at {image_url} is orphaned");
                Err(ServiceError::RecordWrite(e.to_string()))
            }
        }
    }

    /// Store the upload, then repoint every row of product `existing` at it.
    ///
    /// Rows are matched on their product id, not their row id. The object the
    /// rows previously referenced stays in the bucket. Matching no rows is not
    /// an error, and a non-positive `existing` matches none.
    pub async fn replace(&self, existing: i32, upload: ImageUpload) -> ServiceResult<()> {
        let existing = ProductId::new(existing).ok();
        let lock_ids: Vec<ProductId> = existing.into_iter().chain([upload.product_id]).collect();
        let _guards = self.lock(&lock_ids).await;

        let product_id = upload.product_id;
        let image_url = self.write_blob(upload).await?;

        let Some(existing) = existing else {
            log::debug!("No image rows to repoint to {image_url}");
            return Ok(());
        };

        let new_image = NewProductImage {
            product_id,
            image_url: image_url.clone(),
        };

        match self.repo.update_images_for_product(existing, &new_image) {
            Ok(affected) => {
                log::debug!("Repointed {affected} image row(s) of product {existing} to {image_url}");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to update image rows of product {existing}: {e}");
                log::warn!("Object at {image_url} is orphaned");
                Err(ServiceError::RecordWrite(e.to_string()))
            }
        }
    }

    /// Delete the object of the first image row of `product_id`, then every
    /// row of that product.
    pub async fn detach(&self, product_id: ProductId) -> ServiceResult<()> {
        let _guards = self.lock(&[product_id]).await;

        let images = match self.repo.list_images_for_product(product_id) {
            Ok(images) => images,
            Err(e) => {
                log::error!("Failed to list images of product {product_id}: {e}");
                return Err(ServiceError::Internal);
            }
        };

        let Some(first) = images.first() else {
            return Err(ServiceError::NotFound);
        };

        if images.len() > 1 {
            log::warn!(
                "Product {product_id} has {} images; only the object of image {} is deleted",
                images.len(),
                first.id
            );
        }

        let key = match first.image_url.blob_key() {
            Ok(key) => key,
            Err(e) => {
                log::error!("Image {} has an unusable URL {}: {e}", first.id, first.image_url);
                return Err(ServiceError::Internal);
            }
        };

        if let Err(e) = self.store.delete(&key).await {
            log::error!("Failed to delete object `{key}`: {e}");
            return Err(ServiceError::StorageDelete(e.to_string()));
        }

        match self.repo.delete_images_for_product(product_id) {
            Ok(affected) => {
                log::debug!("Deleted {affected} image row(s) of product {product_id}");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to delete image rows of product {product_id}: {e}");
                log::warn!("Rows of product {product_id} reference deleted object `{key}`");
                Err(ServiceError::RecordDelete(e.to_string()))
            }
        }
    }
}

/// List every image row.
pub fn list_product_images<R>(repo: &R) -> ServiceResult<Vec<ProductImage>>
where
    R: ProductImageReader,
{
    match repo.list_product_images() {
        Ok(images) => Ok(images),
        Err(e) => {
            log::error!("Failed to list product images: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// List the image rows of one product; an unknown product has none.
pub fn list_images_for_product<R>(product_id: i32, repo: &R) -> ServiceResult<Vec<ProductImage>>
where
    R: ProductImageReader,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Ok(Vec::new());
    };

    match repo.list_images_for_product(product_id) {
        Ok(images) => Ok(images),
        Err(e) => {
            log::error!("Failed to list images of product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
