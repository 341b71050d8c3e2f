//! Error types for Google Drive uploader

use thiserror::Error;

/// Google Drive uploader errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// Token rejected by the API
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// API request returned an error
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Source photo could not be fetched
    #[error("Download of {url} failed with status {status_code}")]
    DownloadFailed { status_code: u16, url: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl From<bridge_traits::error::BridgeError> for GoogleDriveError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        GoogleDriveError::NetworkError(error.to_string())
    }
}
