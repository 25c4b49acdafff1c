use thiserror::Error;

/// Error type used by service layer functions.
///
/// The storage and record variants distinguish which half of the image
/// attachment protocol failed, since each leaves a different inconsistency
/// behind. Payloads carry the underlying error text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The request payload could not be turned into domain values.
    #[error("{0}")]
    Form(String),
    /// Writing an object to the blob store failed.
    #[error("storage write failed: {0}")]
    StorageWrite(String),
    /// Deleting an object from the blob store failed.
    #[error("storage delete failed: {0}")]
    StorageDelete(String),
    /// Inserting or updating a row failed.
    #[error("record write failed: {0}")]
    RecordWrite(String),
    /// Deleting a row failed.
    #[error("record delete failed: {0}")]
    RecordDelete(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound => "not_found",
            ServiceError::Form(_) => "invalid_request",
            ServiceError::StorageWrite(_) => "storage_write",
            ServiceError::StorageDelete(_) => "storage_delete",
            ServiceError::RecordWrite(_) => "record_write",
            ServiceError::RecordDelete(_) => "record_delete",
            ServiceError::Internal => "internal",
        }
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
