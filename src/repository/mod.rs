use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product};
use crate::domain::product_image::{NewProductImage, ProductImage};
use crate::domain::types::{ProductId, ProductImageId};

pub mod errors;
pub mod product;
pub mod product_image;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List every product ordered by identifier.
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
///
/// Update and delete report the affected row count; callers decide whether
/// a miss matters.
pub trait ProductWriter {
    /// Persist a new product and return its store-assigned identifier.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<ProductId>;
    /// Overwrite every field of a product.
    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize>;
    /// Delete a product by id.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for product image rows.
pub trait ProductImageReader {
    /// List all image rows.
    fn list_product_images(&self) -> RepositoryResult<Vec<ProductImage>>;
    /// List image rows referencing a product, oldest first.
    fn list_images_for_product(&self, product_id: ProductId)
    -> RepositoryResult<Vec<ProductImage>>;
}

/// Write operations for product image rows.
pub trait ProductImageWriter {
    /// Insert an image row and return its store-assigned identifier.
    fn create_product_image(&self, image: &NewProductImage) -> RepositoryResult<ProductImageId>;
    /// Overwrite `product_id` and `image_url` of every row referencing
    /// `product_id`.
    fn update_images_for_product(
        &self,
        product_id: ProductId,
        image: &NewProductImage,
    ) -> RepositoryResult<usize>;
    /// Delete every row referencing `product_id`.
    fn delete_images_for_product(&self, product_id: ProductId) -> RepositoryResult<usize>;
}
