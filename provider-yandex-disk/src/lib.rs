//! # Yandex Disk Uploader
//!
//! Implements [`PhotoUploader`](core_library::PhotoUploader) for the Yandex
//! Disk REST API.
//!
//! Uploads are remote-to-remote: Yandex Disk is handed the source URL and
//! fetches the photo itself, so no image bytes pass through this process.

pub mod connector;
pub mod error;

pub use connector::{FolderStatus, YandexDiskUploader};
pub use error::{Result, YandexDiskError};
