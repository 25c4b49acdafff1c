pub mod errors;
pub mod product_images;
pub mod products;

pub use errors::{ServiceError, ServiceResult};
