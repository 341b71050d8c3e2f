//! Error types for the Yandex Disk uploader

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YandexDiskError {
    /// Unexpected HTTP status
    #[error("Yandex Disk API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),
}

pub type Result<T> = std::result::Result<T, YandexDiskError>;

impl From<bridge_traits::error::BridgeError> for YandexDiskError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        YandexDiskError::NetworkError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = YandexDiskError::ApiError {
            status_code: 401,
            message: "Не авторизован.".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Yandex Disk API error (status 401): Не авторизован."
        );
    }
}
