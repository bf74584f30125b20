use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Writes `bytes` at `relative` below the store root, creating parent
    /// directories as needed. Returns the full path written.
    async fn write_bytes(&self, relative: &Path, bytes: &[u8]) -> io::Result<PathBuf>;
}
