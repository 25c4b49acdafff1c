use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::models::config::ErrorMode;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::product_images::ImageAttachmentCoordinator;

pub mod product_images;
pub mod products;

/// Coordinator wired to the production repository and a runtime-selected
/// blob store.
pub type AppCoordinator = ImageAttachmentCoordinator<DieselRepository>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// Register every catalog endpoint.
///
/// The caller provides `DieselRepository`, `AppCoordinator` and `ErrorMode` as
/// app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(products::list_products)
        .service(products::get_product)
        .service(products::create_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(product_images::list_product_images)
        .service(product_images::list_images_for_product)
        .service(product_images::attach_image)
        .service(product_images::replace_image)
        .service(product_images::detach_image);
}

/// Render a service error according to the configured [`ErrorMode`].
pub fn error_response(err: &ServiceError, mode: ErrorMode) -> HttpResponse {
    match mode {
        ErrorMode::Recovered => {
            let message = match err {
                ServiceError::Form(message) => Some(message.as_str()),
                _ => None,
            };
            let body = ErrorBody {
                error: err.kind(),
                message,
            };
            match err {
                ServiceError::NotFound => HttpResponse::NotFound().json(body),
                ServiceError::Form(_) => HttpResponse::BadRequest().json(body),
                _ => HttpResponse::InternalServerError().json(body),
            }
        }
        ErrorMode::Legacy => match err {
            ServiceError::StorageWrite(raw) | ServiceError::StorageDelete(raw) => {
                HttpResponse::InternalServerError().body(raw.clone())
            }
            ServiceError::Form(message) => HttpResponse::BadRequest().body(message.clone()),
            _ => HttpResponse::InternalServerError().finish(),
        },
    }
}

/// Plain-text acknowledgement body used by mutating endpoints.
pub fn ack(message: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(message)
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    use super::*;

    #[actix_web::test]
    async fn recovered_mode_hides_store_details() {
        let err = ServiceError::StorageWrite("bucket quota exceeded".into());
        let response = error_response(&err, ErrorMode::Recovered);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body.as_ref(), br#"{"error":"storage_write"}"#);
    }

    #[actix_web::test]
    async fn legacy_mode_returns_raw_storage_error() {
        let err = ServiceError::StorageDelete("forbidden".into());
        let response = error_response(&err, ErrorMode::Legacy);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body.as_ref(), b"forbidden");
    }

    #[test]
    fn not_found_and_form_errors_map_to_client_statuses() {
        assert_eq!(
            error_response(&ServiceError::NotFound, ErrorMode::Recovered).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&ServiceError::Form("bad".into()), ErrorMode::Recovered).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&ServiceError::RecordWrite("x".into()), ErrorMode::Legacy).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
