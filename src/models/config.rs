use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Public host serving Google Cloud Storage objects.
pub const GCS_PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// Which blob store backs product images.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Google Cloud Storage bucket.
    Gcs,
    /// Local directory served by the application under `/blobs`.
    Fs,
    /// Process-local map, lost on restart.
    Memory,
}

/// How service errors are rendered to clients.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Status codes per error class with a JSON error kind.
    Recovered,
    /// Response shapes expected by existing API clients: raw storage errors, empty 500s.
    Legacy,
}

/// Whether image writes for the same product are serialized.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageWritePolicy {
    /// No locking; concurrent requests on one product may interleave.
    Unserialized,
    /// Attach, replace and detach hold a per-product lock.
    PerProduct,
}

/// Configuration options for the catalog service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// SQLite database path.
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub gcloud_storage_bucket: Option<String>,
    /// Bearer token for the GCS JSON API. Public buckets with open write
    /// access work without one.
    pub gcloud_access_token: Option<String>,
    /// Overrides the base URL image URLs are built from.
    pub public_base_url: Option<String>,
    /// Root directory of the `fs` backend.
    pub blob_dir: String,
    pub storage_timeout_secs: u64,
    pub error_mode: ErrorMode,
    pub image_write_policy: ImageWritePolicy,
    pub upload_limit_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from defaults, `config/default.yaml`, the file named
    /// by `APP_CONFIG` and finally the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            Self::defaults()?.add_source(File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var("APP_CONFIG") {
            builder = builder.add_source(File::with_name(&path));
        }

        builder
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("address", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database_url", "app.db")?
            .set_default("storage_backend", "gcs")?
            .set_default("blob_dir", "blobs")?
            .set_default("storage_timeout_secs", 30)?
            .set_default("error_mode", "recovered")?
            .set_default("image_write_policy", "unserialized")?
            .set_default("upload_limit_bytes", 10 * 1024 * 1024)
    }

    /// Base URL under which stored objects are publicly addressable.
    pub fn bucket_base_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.public_base_url {
            return Ok(url.trim_end_matches('/').to_string());
        }

        match self.storage_backend {
            StorageBackend::Gcs => Ok(format!("{GCS_PUBLIC_HOST}/{}", self.gcs_bucket()?)),
            StorageBackend::Fs => {
                let host = match self.address.as_str() {
                    "0.0.0.0" | "::" => "localhost",
                    other => other,
                };
                Ok(format!("http://{host}:{}/blobs", self.port))
            }
            StorageBackend::Memory => Ok(format!(
                "memory://{}",
                self.gcloud_storage_bucket.as_deref().unwrap_or("local")
            )),
        }
    }

    /// Name of the GCS bucket; required by the `gcs` backend.
    pub fn gcs_bucket(&self) -> Result<&str, ConfigError> {
        self.gcloud_storage_bucket
            .as_deref()
            .filter(|bucket| !bucket.trim().is_empty())
            .ok_or_else(|| ConfigError::NotFound("gcloud_storage_bucket".to_string()))
    }
}
