/// Media store manager
///
/// Coordinates the storage backend with database metadata tracking.
/// Images are content-addressed: the id is the SHA-256 of the bytes,
/// so identical uploads deduplicate naturally.
use crate::{
    error::{ApiError, ApiResult},
    media::{ImageMetadata, ImagePayload, MediaBackend, StoredImage},
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct MediaStore {
    backend: Arc<dyn MediaBackend>,
    db: SqlitePool,
    public_url: String,
}

impl MediaStore {
    pub fn new(backend: Arc<dyn MediaBackend>, db: SqlitePool, public_url: String) -> Self {
        Self {
            backend,
            db,
            public_url,
        }
    }

    /// Derive the content id for a payload
    fn content_id(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Public URL an image is served from
    fn image_url(&self, id: &str) -> String {
        format!("{}/api/file/{}", self.public_url, id)
    }

    /// Probe image dimensions when the payload decodes as an image
    fn probe_dimensions(data: &[u8], mime_type: &str) -> Option<(i64, i64)> {
        if !mime_type.starts_with("image/") {
            return None;
        }

        match image::load_from_memory(data) {
            Ok(img) => Some((i64::from(img.width()), i64::from(img.height()))),
            Err(e) => {
                tracing::warn!("Failed to probe image dimensions: {}", e);
                None
            }
        }
    }

    /// Persist an uploaded payload and return its public reference
    pub async fn store_image(
        &self,
        payload: ImagePayload,
        uploader_id: &str,
    ) -> ApiResult<StoredImage> {
        if payload.data.is_empty() {
            return Err(ApiError::Validation("Uploaded file is empty".to_string()));
        }

        let id = Self::content_id(&payload.data);
        let mime_type = payload
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let size = payload.data.len() as i64;
        let dimensions = Self::probe_dimensions(&payload.data, &mime_type);

        // Re-uploads of identical content keep the original metadata row
        sqlx::query(
            "INSERT OR IGNORE INTO images (id, mime_type, size, width, height, uploader_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&id)
        .bind(&mime_type)
        .bind(size)
        .bind(dimensions.map(|(w, _)| w))
        .bind(dimensions.map(|(_, h)| h))
        .bind(uploader_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if !self.backend.exists(&id).await? {
            self.backend.put(&id, payload.data).await?;
        }

        Ok(StoredImage {
            url: self.image_url(&id),
            id,
            mime_type,
            size,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
        })
    }

    /// Fetch stored bytes and their mime type
    pub async fn fetch(&self, id: &str) -> ApiResult<Option<(Vec<u8>, String)>> {
        let metadata = match self.metadata(id).await? {
            Some(metadata) => metadata,
            None => return Ok(None),
        };

        match self.backend.get(id).await? {
            Some(data) => Ok(Some((data, metadata.mime_type))),
            None => Ok(None),
        }
    }

    /// Look up the metadata row for an image
    pub async fn metadata(&self, id: &str) -> ApiResult<Option<ImageMetadata>> {
        let metadata =
            sqlx::query_as::<_, ImageMetadata>("SELECT * FROM images WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::disk::DiskMediaBackend;

    async fn test_media_store(dir: &std::path::Path) -> MediaStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        MediaStore::new(
            Arc::new(DiskMediaBackend::new(dir.to_path_buf())),
            pool,
            "http://localhost:8080".to_string(),
        )
    }

    fn payload(bytes: &[u8]) -> ImagePayload {
        ImagePayload {
            data: bytes.to_vec(),
            mime_type: Some("image/png".to_string()),
            file_name: Some("avatar.png".to_string()),
        }
    }

    #[tokio::test]
    async fn store_then_fetch_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_media_store(dir.path()).await;

        let stored = store.store_image(payload(b"png-bytes"), "u-1").await.unwrap();
        assert_eq!(stored.size, 9);
        assert!(stored.url.ends_with(&stored.id));
        assert!(stored.url.starts_with("http://localhost:8080/api/file/"));

        let (data, mime) = store.fetch(&stored.id).await.unwrap().unwrap();
        assert_eq!(data, b"png-bytes".to_vec());
        assert_eq!(mime, "image/png");
    }

    #[tokio::test]
    async fn identical_content_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_media_store(dir.path()).await;

        let first = store.store_image(payload(b"same"), "u-1").await.unwrap();
        let second = store.store_image(payload(b"same"), "u-2").await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&store.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_media_store(dir.path()).await;

        let err = store.store_image(payload(b""), "u-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_id_fetches_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_media_store(dir.path()).await;

        assert!(store.fetch("no-such-id").await.unwrap().is_none());
    }
}
