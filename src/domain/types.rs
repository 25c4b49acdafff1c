//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, image URLs and blob keys are checked at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateUrl;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// A blob key contained a path separator or a relative path component.
    #[error("blob key `{0}` must be a single path segment")]
    InvalidBlobKey(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(ProductId, "Identifier of a product row.", "product_id");
id_newtype!(
    ProductImageId,
    "Identifier of a product image row.",
    "product_image_id"
);

/// Publicly addressable URL of a stored product image.
///
/// The URL is always `<bucket-base-url>/<blob key>`, so the key can be
/// recovered from its final path segment with [`ImageUrl::blob_key`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Constructs a trimmed URL and validates its format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "image url")?;
        if !trimmed.as_str().validate_url() {
            return Err(TypeConstraintError::InvalidUrl("image url"));
        }
        Ok(Self(trimmed))
    }

    /// Joins a bucket base URL and a blob key.
    pub fn for_key(base_url: &str, key: &BlobKey) -> Result<Self, TypeConstraintError> {
        Self::new(format!("{}/{}", base_url.trim_end_matches('/'), key))
    }

    /// Derive the blob key from the final path segment of the URL.
    pub fn blob_key(&self) -> Result<BlobKey, TypeConstraintError> {
        let segment = self.0.rsplit('/').next().unwrap_or_default();
        BlobKey::new(segment)
    }

    /// Borrow the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned URL.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImageUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for ImageUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl PartialEq<&str> for ImageUrl {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Name of an object inside the blob bucket.
///
/// Keys come verbatim from uploaded file names. They must form a single path
/// segment without surrounding whitespace so that the image URL, which is
/// trimmed, round-trips to the same key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct BlobKey(String);

impl BlobKey {
    /// Validates that the key is non-empty, has no surrounding whitespace and
    /// contains no path separators.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TypeConstraintError::EmptyString("blob key"));
        }
        if value.trim() != value
            || value.contains(['/', '\\'])
            || value == "."
            || value == ".."
        {
            return Err(TypeConstraintError::InvalidBlobKey(value));
        }
        Ok(Self(value))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BlobKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for BlobKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for BlobKey {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlobKey> for String {
    fn from(value: BlobKey) -> Self {
        value.0
    }
}

impl PartialEq<&str> for BlobKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
        assert!(ProductImageId::new(-3).is_err());
    }

    #[test]
    fn validates_urls() {
        assert!(ImageUrl::new("https://storage.googleapis.com/bucket/cat.png").is_ok());
        let err = ImageUrl::new("not-a-url").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidUrl("image url"));
    }

    #[test]
    fn image_url_joins_base_and_key() {
        let key = BlobKey::new("cat.png").unwrap();
        let url = ImageUrl::for_key("https://storage.googleapis.com/bucket/", &key).unwrap();
        assert_eq!(url, "https://storage.googleapis.com/bucket/cat.png");
    }

    #[test]
    fn blob_key_is_final_url_segment() {
        let url = ImageUrl::new("https://storage.googleapis.com/bucket/dog.png").unwrap();
        assert_eq!(url.blob_key().unwrap(), "dog.png");
    }

    #[test]
    fn blob_key_rejects_trailing_slash_urls() {
        let url = ImageUrl::new("https://storage.googleapis.com/bucket/").unwrap();
        assert_eq!(
            url.blob_key().unwrap_err(),
            TypeConstraintError::EmptyString("blob key")
        );
    }

    #[test]
    fn blob_key_rejects_path_components() {
        assert!(BlobKey::new("../etc/passwd").is_err());
        assert!(BlobKey::new("nested/cat.png").is_err());
        assert!(BlobKey::new("..").is_err());
        assert!(BlobKey::new("   ").is_err());
        assert_eq!(BlobKey::new("spaced name.png").unwrap(), "spaced name.png");
    }

    #[test]
    fn blob_key_rejects_surrounding_whitespace() {
        assert!(matches!(
            BlobKey::new("cat.png "),
            Err(TypeConstraintError::InvalidBlobKey(_))
        ));
        assert!(BlobKey::new("\tcat.png").is_err());
    }

    #[test]
    fn image_url_round_trips_inner_whitespace() {
        let key = BlobKey::new("cat photo.png").unwrap();
        let url = ImageUrl::for_key("https://storage.googleapis.com/bucket", &key).unwrap();
        assert_eq!(url.blob_key().unwrap(), key);
    }
}
