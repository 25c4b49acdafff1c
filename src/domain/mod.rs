//! Domain entities shared by the repository, service and route layers.

pub mod product;
pub mod product_image;
pub mod types;
