//! # Google Drive Uploader
//!
//! Implements [`PhotoUploader`](core_library::PhotoUploader) for Google
//! Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Folder lookup by name, so a re-run reuses the folder of a previous run
//! - Folder creation
//! - Fetch-then-push uploads: each photo is downloaded from its source URL
//!   and sent as a `multipart/related` create call
//!
//! The access token comes from `core-auth`; this crate never refreshes it.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GoogleDriveUploader;
pub use error::{GoogleDriveError, Result};
