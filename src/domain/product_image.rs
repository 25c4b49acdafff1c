use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageUrl, ProductId, ProductImageId};

/// A stored image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    pub id: ProductImageId,
    #[serde(rename = "productID")]
    pub product_id: ProductId,
    #[serde(rename = "imageURL")]
    pub image_url: ImageUrl,
}

/// Data required to insert or overwrite a [`ProductImage`] row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProductImage {
    pub product_id: ProductId,
    pub image_url: ImageUrl,
}
