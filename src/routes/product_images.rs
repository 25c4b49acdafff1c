use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::ProductId;
use crate::forms::product_images::{ImageUpload, UploadImageForm};
use crate::models::config::ErrorMode;
use crate::repository::DieselRepository;
use crate::routes::{AppCoordinator, ack, error_response};
use crate::services::ServiceError;
use crate::services::product_images::{
    list_images_for_product as list_images_for_product_service,
    list_product_images as list_product_images_service,
};

#[get("/product-images")]
pub async fn list_product_images(
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    match list_product_images_service(repo.get_ref()) {
        Ok(images) => HttpResponse::Ok().json(images),
        Err(err) => error_response(&err, **mode),
    }
}

#[get("/product-images/{id}")]
pub async fn list_images_for_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    match list_images_for_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(images) => HttpResponse::Ok().json(images),
        Err(err) => error_response(&err, **mode),
    }
}

#[post("/product-images")]
pub async fn attach_image(
    coordinator: web::Data<AppCoordinator>,
    mode: web::Data<ErrorMode>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let upload = match ImageUpload::from_form(form).await {
        Ok(upload) => upload,
        Err(e) => return error_response(&ServiceError::from(e), **mode),
    };

    match coordinator.attach(upload).await {
        Ok(attached) => HttpResponse::Ok().json(attached),
        Err(err) => error_response(&err, **mode),
    }
}

#[put("/product-images/{id}")]
pub async fn replace_image(
    product_id: web::Path<i32>,
    coordinator: web::Data<AppCoordinator>,
    mode: web::Data<ErrorMode>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let upload = match ImageUpload::from_form(form).await {
        Ok(upload) => upload,
        Err(e) => return error_response(&ServiceError::from(e), **mode),
    };

    match coordinator.replace(product_id.into_inner(), upload).await {
        Ok(()) => ack("Product image updated"),
        Err(err) => error_response(&err, **mode),
    }
}

#[delete("/product-images/{id}")]
pub async fn detach_image(
    product_id: web::Path<i32>,
    coordinator: web::Data<AppCoordinator>,
    mode: web::Data<ErrorMode>,
) -> impl Responder {
    let Ok(product_id) = ProductId::new(product_id.into_inner()) else {
        return error_response(&ServiceError::NotFound, **mode);
    };

    match coordinator.detach(product_id).await {
        Ok(()) => ack("Product image deleted"),
        Err(err) => error_response(&err, **mode),
    }
}
