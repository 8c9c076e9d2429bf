/// Image storage system
///
/// Handles binary image storage behind a pluggable backend, with
/// metadata tracked in the database.

pub mod disk;
pub mod store;

pub use store::MediaStore;

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media storage backend trait
///
/// Implementations handle the actual storage and retrieval of image bytes.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Store image bytes under an id
    async fn put(&self, id: &str, data: Vec<u8>) -> ApiResult<()>;

    /// Retrieve image bytes by id
    async fn get(&self, id: &str) -> ApiResult<Option<Vec<u8>>>;

    /// Check if an image exists
    async fn exists(&self, id: &str) -> ApiResult<bool>;
}

/// Binary upload payload, decoupled from the transport it arrived on
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImagePayload {
    /// Sole conversion entry point for uploaded files
    ///
    /// Takes the first multipart field carrying a file (or named like
    /// one); returns None when the request contains no file at all.
    pub async fn from_multipart(multipart: &mut Multipart) -> ApiResult<Option<ImagePayload>> {
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::Validation(format!("Malformed multipart request: {}", e))
        })? {
            let named_like_a_file = matches!(
                field.name(),
                Some("image") | Some("avatar") | Some("file")
            );
            if field.file_name().is_none() && !named_like_a_file {
                continue;
            }

            let mime_type = field.content_type().map(String::from);
            let file_name = field.file_name().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?
                .to_vec();

            return Ok(Some(ImagePayload {
                data,
                mime_type,
                file_name,
            }));
        }

        Ok(None)
    }
}

/// Image metadata stored in the database
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub id: String,
    pub mime_type: String,
    pub size: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub uploader_id: String,
    pub created_at: DateTime<Utc>,
}

/// Stored image reference returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: String,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}
