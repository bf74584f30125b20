use crate::{config::StorageConfig, storage::traits::ImageStore};
use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Stores images on the local filesystem under `base_dir`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.images_dir.clone())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn write_bytes(&self, relative: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to write outside the image directory: {}", relative.display()),
            ));
        }

        let path = self.base_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
