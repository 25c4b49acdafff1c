use serde::Deserialize;

use crate::domain::product::NewProduct;

/// JSON body accepted by `POST /products` and `PUT /products/{id}`.
///
/// Every field is optional and nothing is validated.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(rename = "productName", alias = "name")]
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub review: Option<String>,
}

impl From<ProductForm> for NewProduct {
    fn from(form: ProductForm) -> Self {
        Self {
            name: form.name,
            category: form.category,
            description: form.description,
            price: form.price,
            review: form.review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_and_short_name_keys() {
        let legacy: ProductForm =
            serde_json::from_str(r#"{"productName":"Lamp","price":12.5}"#).unwrap();
        let short: ProductForm = serde_json::from_str(r#"{"name":"Lamp"}"#).unwrap();

        assert_eq!(legacy.name.as_deref(), Some("Lamp"));
        assert_eq!(legacy.price, Some(12.5));
        assert_eq!(short.name.as_deref(), Some("Lamp"));
    }

    #[test]
    fn missing_fields_become_none() {
        let form: ProductForm = serde_json::from_str("{}").unwrap();
        assert_eq!(NewProduct::from(form), NewProduct::default());
    }
}
