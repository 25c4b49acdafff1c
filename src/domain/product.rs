use serde::{Deserialize, Serialize};

use crate::domain::types::ProductId;

/// A catalog product.
///
/// Field names on the wire follow the public API contract (`productID`,
/// `productName`), which predates this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "productID")]
    pub id: ProductId,
    #[serde(rename = "productName")]
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub review: Option<String>,
}

/// Fields written when a [`Product`] is created or overwritten.
///
/// Nothing here is validated; absent fields are stored as NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    #[serde(rename = "productName")]
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub review: Option<String>,
}
