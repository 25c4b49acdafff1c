//! Diesel row structs mirroring `schema.rs`.

#[cfg(feature = "server")]
pub mod config;
pub mod product;
pub mod product_image;
