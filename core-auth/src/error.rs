use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Client secrets file \"{path}\" not found")]
    SecretsMissing { path: String },

    #[error("Invalid client secrets: {0}")]
    InvalidSecrets(String),

    #[error("Cached token is corrupted: {reason}")]
    TokenCorrupted { reason: String },

    #[error("Token storage failed: {0}")]
    Storage(String),

    #[error("OAuth state mismatch: expected {expected}, got {actual}")]
    StateMismatch { expected: String, actual: String },

    #[error("Invalid authorization code: {0}")]
    InvalidAuthCode(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No authorization callback received within {seconds}s")]
    CallbackTimeout { seconds: u64 },

    #[error("Loopback redirect failed: {0}")]
    Loopback(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::SecretsMissing {
            path: "credentials.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Client secrets file \"credentials.json\" not found"
        );

        let err = AuthError::CallbackTimeout { seconds: 300 };
        assert_eq!(
            err.to_string(),
            "No authorization callback received within 300s"
        );
    }
}
