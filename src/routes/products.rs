use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Serialize;

use crate::domain::types::ProductId;
use crate::forms::products::ProductForm;
use crate::models::config::ErrorMode;
use crate::repository::DieselRepository;
use crate::routes::{ack, error_response};
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    update_product as update_product_service,
};

#[derive(Serialize)]
struct CreatedProduct {
    id: ProductId,
}

#[get("/products")]
pub async fn list_products(
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    match list_products_service(repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(&err, **mode),
    }
}

#[get("/products/{id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    match get_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) if **mode == ErrorMode::Legacy => HttpResponse::Ok().finish(),
        Err(err) => error_response(&err, **mode),
    }
}

#[post("/products")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match create_product_service(form.into(), repo.get_ref()) {
        Ok(id) => HttpResponse::Ok().json(CreatedProduct { id }),
        Err(err) => error_response(&err, **mode),
    }
}

#[put("/products/{id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match update_product_service(product_id.into_inner(), form.into(), repo.get_ref()) {
        Ok(()) => ack("Product updated"),
        Err(err) => error_response(&err, **mode),
    }
}

#[delete("/products/{id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(()) => ack("Product deleted"),
        Err(err) => error_response(&err, **mode),
    }
}
