//! Google client-secrets file
//!
//! The file downloaded from the Google Cloud console has a single root key,
//! `installed` for desktop clients or `web` for web clients:
//!
//! ```json
//! {"installed": {"client_id": "...", "client_secret": "...",
//!   "auth_uri": "https://accounts.google.com/o/oauth2/auth",
//!   "token_uri": "https://oauth2.googleapis.com/token",
//!   "redirect_uris": ["http://localhost"]}}
//! ```

use crate::error::{AuthError, Result};
use bridge_traits::storage::FileSystemAccess;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Client credentials of the OAuth application.
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Read and parse the client-secrets file at `path`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SecretsMissing`] if the file does not exist
    /// - [`AuthError::InvalidSecrets`] if it cannot be read or parsed
    pub async fn load(fs: &dyn FileSystemAccess, path: &Path) -> Result<Self> {
        let exists = fs
            .exists(path)
            .await
            .map_err(|e| AuthError::InvalidSecrets(e.to_string()))?;

        if !exists {
            return Err(AuthError::SecretsMissing {
                path: path.display().to_string(),
            });
        }

        let data = fs
            .read_file(path)
            .await
            .map_err(|e| AuthError::InvalidSecrets(e.to_string()))?;

        let secrets = Self::parse(&data)?;
        debug!(path = %path.display(), "Loaded client secrets");
        Ok(secrets)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        let file: SecretsFile = serde_json::from_slice(data)
            .map_err(|e| AuthError::InvalidSecrets(e.to_string()))?;

        let secrets = file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidSecrets("expected an \"installed\" or \"web\" section".to_string())
        })?;

        if secrets.client_id.trim().is_empty() {
            return Err(AuthError::InvalidSecrets("client_id is empty".to_string()));
        }

        Ok(secrets)
    }
}

impl std::fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
