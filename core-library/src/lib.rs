//! # Album Library
//!
//! Backend-independent pieces of an album backup.
//!
//! ## Overview
//!
//! This crate provides:
//! - Domain models: albums, resolution tags, photos, batches
//! - Filename disambiguation for photos named by like count
//! - The JSON manifest of backed-up files
//! - The [`PhotoUploader`] capability implemented by each storage backend

pub mod dedup;
pub mod error;
pub mod manifest;
pub mod models;
pub mod uploader;

pub use error::{LibraryError, Result};
pub use manifest::{build_manifest, write_manifest};
pub use models::{
    folder_name, Album, ManifestEntry, Photo, PhotoBatch, RemoteFolder, ResolutionTag,
    DEFAULT_API_VERSION, MAX_PHOTO_COUNT,
};
pub use uploader::PhotoUploader;
