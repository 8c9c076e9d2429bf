/// Disk-based media storage backend
use crate::{
    error::{ApiError, ApiResult},
    media::MediaBackend,
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Disk storage backend
///
/// Stores images on the local filesystem with directory sharding based
/// on id prefixes to prevent too many files in one directory.
#[derive(Clone)]
pub struct DiskMediaBackend {
    base_path: PathBuf,
}

impl DiskMediaBackend {
    /// Create a new disk storage backend
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the file path for an id: {base}/{first2chars}/{id}
    fn image_path(&self, id: &str) -> PathBuf {
        if id.len() >= 2 {
            let shard = &id[0..2];
            self.base_path.join(shard).join(id)
        } else {
            self.base_path.join("_").join(id)
        }
    }

    /// Ensure the directory for an image exists
    async fn ensure_image_dir(&self, id: &str) -> ApiResult<PathBuf> {
        let path = self.image_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ApiError::Dependency(format!("Failed to create media directory: {}", e))
            })?;
        }
        Ok(path)
    }
}

#[async_trait]
impl MediaBackend for DiskMediaBackend {
    async fn put(&self, id: &str, data: Vec<u8>) -> ApiResult<()> {
        let path = self.ensure_image_dir(id).await?;

        fs::write(&path, data)
            .await
            .map_err(|e| ApiError::Dependency(format!("Failed to write image {}: {}", id, e)))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> ApiResult<Option<Vec<u8>>> {
        let path = self.image_path(id);

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Dependency(format!(
                "Failed to read image {}: {}",
                id, e
            ))),
        }
    }

    async fn exists(&self, id: &str) -> ApiResult<bool> {
        Ok(self.image_path(id).exists())
    }
}
