use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::domain::types::{BlobKey, ImageUrl};
use crate::storage::{BlobStore, StorageError, StorageResult};

/// Root of the Google Cloud Storage JSON API.
const GCS_API_URL: &str = "https://storage.googleapis.com";

/// Google Cloud Storage bucket accessed through the JSON API.
///
/// Objects are uploaded with the simple media upload and are expected to be
/// publicly readable under `base_url`.
#[derive(Clone)]
pub struct GcsBlobStore {
    client: Client,
    api_url: Url,
    bucket: String,
    access_token: Option<String>,
    base_url: String,
}

impl fmt::Debug for GcsBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsBlobStore")
            .field("api_url", &self.api_url.as_str())
            .field("bucket", &self.bucket)
            .field("authorized", &self.access_token.is_some())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GcsBlobStore {
    pub fn new(
        bucket: impl Into<String>,
        access_token: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, GCS_API_URL, bucket, access_token, base_url)
    }

    /// Build a store against a custom API root, e.g. a local GCS emulator.
    pub fn with_client(
        client: Client,
        api_url: &str,
        bucket: impl Into<String>,
        access_token: Option<String>,
        base_url: impl Into<String>,
    ) -> StorageResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| StorageError::Endpoint(e.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(StorageError::Endpoint(api_url.to_string()));
        }

        Ok(Self {
            client,
            api_url,
            bucket: bucket.into(),
            access_token: access_token.filter(|token| !token.is_empty()),
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> StorageResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Endpoint(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn upload_url(&self, key: &BlobKey) -> StorageResult<Url> {
        let segments = ["upload", "storage", "v1", "b", self.bucket.as_str(), "o"];
        let mut url = self.endpoint(&segments)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", key.as_str());
        Ok(url)
    }

    fn object_url(&self, key: &BlobKey) -> StorageResult<Url> {
        self.endpoint(&["storage", "v1", "b", self.bucket.as_str(), "o", key.as_str()])
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn ensure_success(key: &BlobKey, response: Response) -> StorageResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.clone()));
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn write(&self, key: &BlobKey, bytes: Vec<u8>) -> StorageResult<ImageUrl> {
        let url = self.public_url(key)?;
        let request = self
            .client
            .post(self.upload_url(key)?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);

        let response = self.authorize(request).send().await?;
        Self::ensure_success(key, response).await?;
        Ok(url)
    }

    async fn delete(&self, key: &BlobKey) -> StorageResult<()> {
        let request = self.client.delete(self.object_url(key)?);
        let response = self.authorize(request).send().await?;
        Self::ensure_success(key, response).await?;
        Ok(())
    }

    async fn read(&self, key: &BlobKey) -> StorageResult<Vec<u8>> {
        let mut url = self.object_url(key)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.authorize(self.client.get(url)).send().await?;
        let response = Self::ensure_success(key, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn public_url(&self, key: &BlobKey) -> StorageResult<ImageUrl> {
        Ok(ImageUrl::for_key(&self.base_url, key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GcsBlobStore {
        GcsBlobStore::with_client(
            Client::new(),
            GCS_API_URL,
            "shop-images",
            None,
            "https://storage.googleapis.com/shop-images",
        )
        .unwrap()
    }

    #[test]
    fn builds_media_upload_url() {
        let key = BlobKey::new("cat photo.png").unwrap();
        let url = store().upload_url(&key).unwrap();

        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/upload/storage/v1/b/shop-images/o?uploadType=media&name=cat+photo.png"
        );
    }

    #[test]
    fn object_url_encodes_key_as_one_segment() {
        let key = BlobKey::new("cat#1.png").unwrap();
        let url = store().object_url(&key).unwrap();

        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/shop-images/o/cat%231.png"
        );
    }

    #[test]
    fn public_url_is_base_plus_key() {
        let key = BlobKey::new("dog.png").unwrap();
        assert_eq!(
            store().public_url(&key).unwrap(),
            "https://storage.googleapis.com/shop-images/dog.png"
        );
    }

    #[test]
    fn rejects_non_base_endpoints() {
        let err =
            GcsBlobStore::with_client(Client::new(), "mailto:ops@example.com", "b", None, "x")
                .unwrap_err();
        assert!(matches!(err, StorageError::Endpoint(_)));
    }

    #[test]
    fn debug_output_omits_access_token() {
        let store = GcsBlobStore::with_client(
            Client::new(),
            GCS_API_URL,
            "shop-images",
            Some("secret-token".into()),
            "https://storage.googleapis.com/shop-images",
        )
        .unwrap();

        let debug = format!("{store:?}");
        assert!(debug.contains("shop-images"));
        assert!(!debug.contains("secret-token"));
    }
}
