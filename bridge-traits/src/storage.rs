//! File System Abstraction
//!
//! Provides a platform-agnostic trait for the handful of local files a run
//! touches: the manifest, the cached OAuth token and the client-secrets file.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File system access trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn save_manifest(fs: &dyn FileSystemAccess, data: &[u8]) -> Result<()> {
///     fs.write_file(Path::new("files_info.json"), Bytes::copy_from_slice(data)).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Write data to a file, creating it if it doesn't exist and
    /// truncating it if it does
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;
}
