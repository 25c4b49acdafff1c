//! Single-statement CRUD over the `products` table.
//!
//! None of these operations coordinate with other resources. Update and
//! delete do not check the affected row count, so a miss is a silent success.

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::ProductId;
use crate::repository::{ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

/// List every product.
pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products() {
        Ok(products) => Ok(products),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single product. Non-positive identifiers never match.
pub fn get_product<R>(product_id: i32, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let product_id = match ProductId::new(product_id) {
        Ok(product_id) => product_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Insert a product and return its new identifier.
pub fn create_product<R>(product: NewProduct, repo: &R) -> ServiceResult<ProductId>
where
    R: ProductWriter,
{
    match repo.create_product(&product) {
        Ok(product_id) => Ok(product_id),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::RecordWrite(e.to_string()))
        }
    }
}

/// Overwrite every field of a product.
pub fn update_product<R>(product_id: i32, product: NewProduct, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Ok(());
    };

    match repo.update_product(product_id, &product) {
        Ok(affected) => {
            log::debug!("Updated product {product_id}, {affected} row(s) affected");
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to update product {product_id}: {e}");
            Err(ServiceError::RecordWrite(e.to_string()))
        }
    }
}

/// Delete a product. Images referencing it are left untouched.
pub fn delete_product<R>(product_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Ok(());
    };

    match repo.delete_product(product_id) {
        Ok(affected) => {
            log::debug!("Deleted product {product_id}, {affected} row(s) affected");
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete product {product_id}: {e}");
            Err(ServiceError::RecordDelete(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    fn sample_product() -> NewProduct {
        NewProduct {
            name: Some("Trail Runner".into()),
            category: Some("Shoes".into()),
            description: Some("Lightweight running shoe".into()),
            price: Some(129.99),
            review: Some("Great grip on wet rock".into()),
        }
    }

    #[test]
    fn created_product_reads_back_unchanged() {
        let repo = TestRepository::default();

        let id = create_product(sample_product(), &repo).unwrap();
        let product = get_product(id.get(), &repo).unwrap();

        let expected = sample_product();
        assert_eq!(product.id, id);
        assert_eq!(product.name, expected.name);
        assert_eq!(product.category, expected.category);
        assert_eq!(product.description, expected.description);
        assert_eq!(product.price, expected.price);
        assert_eq!(product.review, expected.review);
    }

    #[test]
    fn update_overwrites_all_fields() {
        let repo = TestRepository::default();
        let id = create_product(sample_product(), &repo).unwrap();

        let changes = NewProduct {
            name: Some("Trail Runner 2".into()),
            price: Some(99.0),
            ..Default::default()
        };
        update_product(id.get(), changes, &repo).unwrap();

        let product = get_product(id.get(), &repo).unwrap();
        assert_eq!(product.name.as_deref(), Some("Trail Runner 2"));
        assert_eq!(product.price, Some(99.0));
        assert_eq!(product.category, None);
        assert_eq!(product.review, None);
    }

    #[test]
    fn update_and_delete_of_missing_product_are_silent() {
        let repo = TestRepository::default();

        assert_eq!(update_product(42, sample_product(), &repo), Ok(()));
        assert_eq!(delete_product(42, &repo), Ok(()));
        assert_eq!(delete_product(-1, &repo), Ok(()));
        assert!(list_products(&repo).unwrap().is_empty());
    }

    #[test]
    fn deleted_product_is_not_found() {
        let repo = TestRepository::default();
        let id = create_product(sample_product(), &repo).unwrap();

        delete_product(id.get(), &repo).unwrap();

        assert_eq!(get_product(id.get(), &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn non_positive_id_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(get_product(0, &repo), Err(ServiceError::NotFound));
    }
}
