//! JSON manifest of a backup run
//!
//! One `{"file_name": "<name>.jpg", "size": "<tag>"}` object per photo, in
//! batch order. The manifest records what was resolved, not what each
//! backend accepted.

use crate::error::{LibraryError, Result};
use crate::models::{ManifestEntry, Photo};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use std::path::Path;
use tracing::{error, info};

pub fn build_manifest(photos: &[Photo]) -> Vec<ManifestEntry> {
    photos.iter().map(ManifestEntry::from).collect()
}

/// Write the manifest for `photos` to `path`, replacing any existing file.
///
/// Returns the number of entries written.
///
/// # Errors
///
/// [`LibraryError::Io`] when `path` cannot be written.
pub async fn write_manifest(
    fs: &dyn FileSystemAccess,
    photos: &[Photo],
    path: &Path,
) -> Result<usize> {
    let entries = build_manifest(photos);
    let data = serde_json::to_vec(&entries)?;

    fs.write_file(path, Bytes::from(data)).await.map_err(|e| {
        error!("Error while creating file {}: {}", path.display(), e);
        LibraryError::Io {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    info!("File {} created successfully", path.display());
    Ok(entries.len())
}
