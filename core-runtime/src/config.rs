//! # Run Configuration
//!
//! Everything one backup run needs, collected up front so nothing is read
//! from standard input mid-run.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::RunConfig;
//!
//! let config = RunConfig::builder()
//!     .source_user_id("1")
//!     .album_id("profile")
//!     .source_token(vk_token)
//!     .destination_token(yandex_token)
//!     .photo_count(10)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! `build()` validates every field and fails fast with
//! [`Error::Config`](crate::error::Error::Config) and an actionable message.

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use core_library::models::folder_name;
use std::fmt;
use std::path::PathBuf;

pub use core_library::models::{DEFAULT_API_VERSION, MAX_PHOTO_COUNT};

pub const DEFAULT_PHOTO_COUNT: u32 = 5;
pub const DEFAULT_MANIFEST_PATH: &str = "files_info.json";
pub const DEFAULT_CLIENT_SECRETS_PATH: &str = "credentials.json";
pub const DEFAULT_TOKEN_CACHE_PATH: &str = "token.json";
pub const DEFAULT_LOG_PATH: &str = "backup_log.log";

/// Parameters of a backup run.
///
/// Use [`RunConfig::builder`] to construct instances.
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// VK user whose album is copied
    pub source_user_id: String,

    /// Album id, or one of the pseudo-albums `wall`, `profile`, `saved`
    pub album_id: String,

    /// VK access token
    pub source_token: String,

    /// Yandex Disk OAuth token
    pub destination_token: String,

    /// Number of photos requested from the album
    pub photo_count: u32,

    /// VK API version sent with every request
    pub api_version: String,

    pub manifest_path: PathBuf,

    /// Google OAuth client-secrets file
    pub client_secrets_path: PathBuf,

    /// Cached Google token file
    pub token_cache_path: PathBuf,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("source_user_id", &self.source_user_id)
            .field("album_id", &self.album_id)
            .field(
                "source_token",
                &redact_if_sensitive("source_token", &self.source_token),
            )
            .field(
                "destination_token",
                &redact_if_sensitive("destination_token", &self.destination_token),
            )
            .field("photo_count", &self.photo_count)
            .field("api_version", &self.api_version)
            .field("manifest_path", &self.manifest_path)
            .field("client_secrets_path", &self.client_secrets_path)
            .field("token_cache_path", &self.token_cache_path)
            .finish()
    }
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Destination folder shared by both storage backends
    pub fn folder_name(&self) -> String {
        folder_name(&self.source_user_id, &self.album_id)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Ids and tokens are not blank
    /// - Photo count is within `1..=MAX_PHOTO_COUNT`
    /// - Output paths are not empty
    pub fn validate(&self) -> Result<()> {
        require_non_blank("source user id", &self.source_user_id)?;
        require_non_blank("album id", &self.album_id)?;
        require_non_blank("VK access token", &self.source_token)?;
        require_non_blank("Yandex Disk token", &self.destination_token)?;
        require_non_blank("API version", &self.api_version)?;

        if !(1..=MAX_PHOTO_COUNT).contains(&self.photo_count) {
            return Err(Error::Config(format!(
                "Photo count must be between 1 and {}, got {}",
                MAX_PHOTO_COUNT, self.photo_count
            )));
        }

        for (name, path) in [
            ("Manifest path", &self.manifest_path),
            ("Client secrets path", &self.client_secrets_path),
            ("Token cache path", &self.token_cache_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

fn require_non_blank(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{} is required", name)));
    }
    Ok(())
}

/// Builder for [`RunConfig`].
#[derive(Default)]
pub struct RunConfigBuilder {
    source_user_id: Option<String>,
    album_id: Option<String>,
    source_token: Option<String>,
    destination_token: Option<String>,
    photo_count: Option<u32>,
    api_version: Option<String>,
    manifest_path: Option<PathBuf>,
    client_secrets_path: Option<PathBuf>,
    token_cache_path: Option<PathBuf>,
}

impl RunConfigBuilder {
    pub fn source_user_id(mut self, id: impl Into<String>) -> Self {
        self.source_user_id = Some(id.into());
        self
    }

    pub fn album_id(mut self, id: impl Into<String>) -> Self {
        self.album_id = Some(id.into());
        self
    }

    pub fn source_token(mut self, token: impl Into<String>) -> Self {
        self.source_token = Some(token.into());
        self
    }

    pub fn destination_token(mut self, token: impl Into<String>) -> Self {
        self.destination_token = Some(token.into());
        self
    }

    /// Default: 5
    pub fn photo_count(mut self, count: u32) -> Self {
        self.photo_count = Some(count);
        self
    }

    /// Default: `5.131`
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Default: `files_info.json`
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Default: `credentials.json`
    pub fn client_secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_secrets_path = Some(path.into());
        self
    }

    /// Default: `token.json`
    pub fn token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

    /// Builds and validates the final `RunConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required field is missing or blank, or
    /// if the photo count is out of range.
    pub fn build(self) -> Result<RunConfig> {
        let config = RunConfig {
            source_user_id: self
                .source_user_id
                .ok_or_else(|| Error::Config("source user id is required".to_string()))?,
            album_id: self
                .album_id
                .ok_or_else(|| Error::Config("album id is required".to_string()))?,
            source_token: self
                .source_token
                .ok_or_else(|| Error::Config("VK access token is required".to_string()))?,
            destination_token: self
                .destination_token
                .ok_or_else(|| Error::Config("Yandex Disk token is required".to_string()))?,
            photo_count: self.photo_count.unwrap_or(DEFAULT_PHOTO_COUNT),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            manifest_path: self
                .manifest_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH)),
            client_secrets_path: self
                .client_secrets_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_SECRETS_PATH)),
            token_cache_path: self
                .token_cache_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_CACHE_PATH)),
        };

        config.validate()?;
        Ok(config)
    }
}
