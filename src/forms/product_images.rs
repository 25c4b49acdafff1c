use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;

use crate::domain::types::{BlobKey, ProductId, TypeConstraintError};

/// Multipart body of `POST /product-images` and `PUT /product-images/{id}`.
///
/// Size is bounded by the app-wide `MultipartFormConfig`.
#[derive(MultipartForm)]
pub struct UploadImageForm {
    pub image: TempFile,
    #[multipart(rename = "productID")]
    pub product_id: Text<i32>,
}

/// A validated image upload: the bytes go to the blob store under
/// `file_name`, the row references `product_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub product_id: ProductId,
    pub file_name: BlobKey,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadImageFormError {
    #[error("uploaded image has no file name")]
    MissingFileName,
    #[error("uploaded image is empty")]
    EmptyFile,
    #[error("failed to read uploaded image")]
    ReadFailed,
    #[error("upload contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for UploadImageFormError {
    fn from(val: TypeConstraintError) -> Self {
        Self::TypeConstraint(val.to_string())
    }
}

impl From<std::io::Error> for UploadImageFormError {
    fn from(_: std::io::Error) -> Self {
        Self::ReadFailed
    }
}

impl ImageUpload {
    /// Validate a multipart upload and read the spooled file.
    pub async fn from_form(form: UploadImageForm) -> Result<Self, UploadImageFormError> {
        let product_id = ProductId::new(form.product_id.into_inner())?;
        let file_name = form
            .image
            .file_name
            .ok_or(UploadImageFormError::MissingFileName)?;
        let file_name = BlobKey::new(file_name)?;

        let bytes = tokio::fs::read(form.image.file.path()).await?;
        if bytes.is_empty() {
            return Err(UploadImageFormError::EmptyFile);
        }

        Ok(Self {
            product_id,
            file_name,
            bytes,
        })
    }
}
