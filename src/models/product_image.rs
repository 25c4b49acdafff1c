use diesel::prelude::*;

use crate::domain::product_image::{
    NewProductImage as DomainNewProductImage, ProductImage as DomainProductImage,
};
use crate::domain::types::{ImageUrl, ProductId, ProductImageId, TypeConstraintError};

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image_url: String,
}

/// Insertable/patchable form of [`ProductImage`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage {
    pub product_id: i32,
    pub image_url: String,
}

impl TryFrom<ProductImage> for DomainProductImage {
    type Error = TypeConstraintError;

    fn try_from(image: ProductImage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductImageId::new(image.id)?,
            product_id: ProductId::new(image.product_id)?,
            image_url: ImageUrl::new(image.image_url)?,
        })
    }
}

impl From<DomainNewProductImage> for NewProductImage {
    fn from(image: DomainNewProductImage) -> Self {
        Self {
            product_id: image.product_id.get(),
            image_url: image.image_url.into_inner(),
        }
    }
}
