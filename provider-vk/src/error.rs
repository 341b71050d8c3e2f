//! Error types for the VK source

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VkError {
    /// Non-success HTTP status
    #[error("VK API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Error object in an otherwise successful response
    #[error("VK API returned error {code}: {message}")]
    MethodError { code: i64, message: String },

    /// Body has neither `response` nor `error`
    #[error("VK API response has no \"response\" payload")]
    MissingResponse,

    #[error("Failed to parse VK API response: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Photo count must be between 1 and {max}, got {count}")]
    InvalidCount { count: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, VkError>;

impl From<bridge_traits::error::BridgeError> for VkError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        VkError::NetworkError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = VkError::MethodError {
            code: 5,
            message: "User authorization failed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "VK API returned error 5: User authorization failed"
        );

        let error = VkError::InvalidCount { count: 0, max: 1000 };
        assert_eq!(error.to_string(), "Photo count must be between 1 and 1000, got 0");
    }

    #[test]
    fn test_bridge_error_conversion() {
        let error: VkError =
            bridge_traits::error::BridgeError::OperationFailed("connection reset".to_string()).into();
        assert!(matches!(error, VkError::NetworkError(msg) if msg.contains("connection reset")));
    }
}
