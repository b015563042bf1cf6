//! External object storage client.
//!
//! Proxies image uploads to the hosted backend's storage API and hands back
//! publicly addressable URLs. Uploads are capped at 5 MiB and restricted to
//! `image/*` content types; object names are randomized so uploads never
//! collide or overwrite each other.

use std::sync::Arc;

use axum::body::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BackendConfig;

/// Maximum accepted upload size in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Errors that can occur when talking to the storage service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upload exceeds the size cap.
    #[error("file exceeds {max_bytes} bytes")]
    TooLarge {
        /// The configured cap.
        max_bytes: usize,
    },

    /// Upload is not an image.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// Multipart request carried no file part.
    #[error("no file provided")]
    MissingFile,

    /// The storage service returned an unexpected status.
    #[error("storage API error ({status}): {message}")]
    Api {
        /// HTTP status code returned.
        status: u16,
        /// Response body, truncated.
        message: String,
    },
}

/// A stored object with its public URL.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    /// Object name within the bucket.
    pub name: String,
    /// Publicly addressable URL.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

/// Client for the external storage service.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: SecretString,
    bucket: String,
}

impl StorageClient {
    /// Create a new storage client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                service_key: config.service_key.clone(),
                bucket: config.storage_bucket.clone(),
            }),
        }
    }

    /// Upload an image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedType` for non-image content,
    /// `StorageError::TooLarge` past the size cap, and
    /// `StorageError::Http`/`StorageError::Api` on transport or service
    /// failures.
    pub async fn upload_image(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredImage, StorageError> {
        if !content_type.starts_with("image/") {
            return Err(StorageError::UnsupportedType(content_type.to_owned()));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(StorageError::TooLarge {
                max_bytes: MAX_IMAGE_BYTES,
            });
        }

        let object_name = randomized_name(original_name);
        let response = self
            .inner
            .client
            .post(format!(
                "{}/storage/v1/object/{}/{object_name}",
                self.inner.base_url, self.inner.bucket
            ))
            .bearer_auth(self.inner.service_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                message: response.text().await?.chars().take(200).collect(),
            });
        }

        let url = self.public_url(&object_name);
        Ok(StoredImage {
            name: object_name,
            url,
        })
    }

    /// List objects in the bucket with their public URLs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Http`/`StorageError::Api` on transport or
    /// service failures.
    pub async fn list_images(&self) -> Result<Vec<StoredImage>, StorageError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/storage/v1/object/list/{}",
                self.inner.base_url, self.inner.bucket
            ))
            .bearer_auth(self.inner.service_key.expose_secret())
            .json(&serde_json::json!({ "prefix": "", "limit": 100 }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                message: response.text().await?.chars().take(200).collect(),
            });
        }

        let objects: Vec<ListedObject> = response.json().await?;
        Ok(objects
            .into_iter()
            .map(|object| {
                let url = self.public_url(&object.name);
                StoredImage {
                    name: object.name,
                    url,
                }
            })
            .collect())
    }

    /// Public URL for an object in the bucket.
    #[must_use]
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{object_name}",
            self.inner.base_url, self.inner.bucket
        )
    }
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.inner.base_url)
            .field("bucket", &self.inner.bucket)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Timestamp-plus-random object name preserving the original extension.
fn randomized_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(char::is_alphanumeric))
        .unwrap_or("bin");
    format!("{millis}-{suffix:08x}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomized_name_keeps_extension() {
        let name = randomized_name("logo.png");
        assert!(name.ends_with(".png"), "got {name}");
        assert!(name.contains('-'));
    }

    #[test]
    fn test_randomized_name_defaults_extension() {
        assert!(randomized_name("noext").ends_with(".bin"));
        assert!(randomized_name("weird.!!").ends_with(".bin"));
    }

    #[test]
    fn test_randomized_names_are_unique() {
        let a = randomized_name("a.jpg");
        let b = randomized_name("a.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::TooLarge {
            max_bytes: MAX_IMAGE_BYTES,
        };
        assert_eq!(err.to_string(), "file exceeds 5242880 bytes");
        assert_eq!(
            StorageError::UnsupportedType("text/plain".to_owned()).to_string(),
            "unsupported content type: text/plain"
        );
    }
}
