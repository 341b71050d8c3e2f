//! Storage backend capability

use crate::models::{Photo, RemoteFolder};
use async_trait::async_trait;

/// A destination that can receive a photo batch.
///
/// Neither operation fails: every outcome is logged at INFO, WARN or ERROR
/// and the caller moves on.
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    /// Human-readable backend name used in log lines, e.g. `Yandex Disk`
    fn backend_name(&self) -> &'static str;

    /// Create `name` at the destination.
    ///
    /// An existing folder is a warning, not an error. The returned reference
    /// is usable even when creation failed.
    async fn create_folder(&self, name: &str) -> RemoteFolder;

    /// Transfer every photo into `folder` as `<file_name>.jpg`.
    ///
    /// A failed item is logged and the next one is attempted.
    async fn upload_batch(&self, folder: &RemoteFolder, photos: &[Photo]);
}
