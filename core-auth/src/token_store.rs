//! Cached Token File
//!
//! Persists the Google OAuth tokens between runs in a small JSON file
//! (`token.json` by default) through the `FileSystemAccess` bridge.
//!
//! Files in the google-auth `authorized_user` layout (`token`, `expiry`,
//! `refresh_token`) are read as well, so a cache left by the Google Python
//! client keeps working. Writes always use the native layout.
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{TokenStore, OAuthTokens};
//! use std::sync::Arc;
//! # use bridge_traits::storage::FileSystemAccess;
//! # async fn example(fs: Arc<dyn FileSystemAccess>) -> core_auth::Result<()> {
//! let token_store = TokenStore::new(fs, "token.json");
//!
//! let tokens = OAuthTokens::new("access".to_string(), Some("refresh".to_string()), 3600);
//! token_store.store_tokens(&tokens).await?;
//!
//! let retrieved = token_store.retrieve_tokens().await?;
//! token_store.delete_tokens().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// File-backed storage for OAuth tokens
#[derive(Clone)]
pub struct TokenStore {
    fs: Arc<dyn FileSystemAccess>,
    path: PathBuf,
}

/// On-disk layout of the token file
#[derive(Debug, Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: Option<String>,
    /// Unix seconds
    expires_at: i64,
}

/// google-auth `Credentials.to_json()` layout
#[derive(Debug, Deserialize)]
struct AuthorizedUserTokens {
    token: String,
    refresh_token: Option<String>,
    /// Missing when google-auth never learned the expiry; treated as expired
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenFile {
    Native(StoredTokens),
    AuthorizedUser(AuthorizedUserTokens),
}

impl From<TokenFile> for OAuthTokens {
    fn from(file: TokenFile) -> Self {
        match file {
            TokenFile::Native(stored) => OAuthTokens::from_parts(
                stored.access_token,
                stored.refresh_token,
                stored.expires_at,
            ),
            TokenFile::AuthorizedUser(user) => OAuthTokens {
                access_token: user.token,
                refresh_token: user.refresh_token,
                expires_at: user.expiry.unwrap_or_default(),
            },
        }
    }
}

impl TokenStore {
    pub fn new(fs: Arc<dyn FileSystemAccess>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store tokens, overwriting the previous file.
    pub async fn store_tokens(&self, tokens: &OAuthTokens) -> Result<()> {
        let stored = StoredTokens {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expires_at.timestamp(),
        };

        let data = serde_json::to_vec_pretty(&stored)
            .map_err(|e| AuthError::Storage(format!("Failed to serialize tokens: {}", e)))?;

        self.fs
            .write_file(&self.path, Bytes::from(data))
            .await
            .map_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Failed to write token cache");
                AuthError::Storage(e.to_string())
            })?;

        info!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_at = stored.expires_at,
            "Tokens stored successfully"
        );

        Ok(())
    }

    /// Retrieve cached tokens.
    ///
    /// Returns `Ok(None)` when no cache file exists. A file in neither the
    /// native nor the `authorized_user` layout is deleted and reported as
    /// [`AuthError::TokenCorrupted`].
    pub async fn retrieve_tokens(&self) -> Result<Option<OAuthTokens>> {
        let exists = self
            .fs
            .exists(&self.path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if !exists {
            debug!(path = %self.path.display(), "No cached tokens found");
            return Ok(None);
        }

        let data = self
            .fs
            .read_file(&self.path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let file: TokenFile = match serde_json::from_slice(&data) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Failed to deserialize tokens, they may be corrupted");

                if let Err(delete_err) = self.delete_tokens().await {
                    warn!(error = %delete_err, "Failed to delete corrupted token data");
                }

                return Err(AuthError::TokenCorrupted {
                    reason: e.to_string(),
                });
            }
        };

        let tokens = OAuthTokens::from(file);

        debug!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_at = tokens.expires_at.timestamp(),
            "Tokens retrieved successfully"
        );

        Ok(Some(tokens))
    }

    /// Delete the token file. Succeeds if it does not exist.
    pub async fn delete_tokens(&self) -> Result<()> {
        let exists = self
            .fs
            .exists(&self.path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if exists {
            self.fs
                .delete_file(&self.path)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
            info!("Cached tokens deleted");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryFs;

    fn store_with(fs: Arc<MemoryFs>) -> TokenStore {
        TokenStore::new(fs, "token.json")
    }

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let fs = Arc::new(MemoryFs::default());
        let store = store_with(fs.clone());

        let tokens = OAuthTokens::new("access".to_string(), Some("refresh".to_string()), 3600);
        store.store_tokens(&tokens).await.unwrap();

        let retrieved = store.retrieve_tokens().await.unwrap().unwrap();
        assert_eq!(retrieved.access_token, "access");
        assert_eq!(retrieved.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(retrieved.expires_at.timestamp(), tokens.expires_at.timestamp());

        let raw = fs.get("token.json").unwrap();
        assert!(raw.contains("\"expires_at\""));
    }

    #[tokio::test]
    async fn test_retrieve_missing_returns_none() {
        let store = store_with(Arc::new(MemoryFs::default()));
        assert!(store.retrieve_tokens().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_deleted() {
        let fs = Arc::new(MemoryFs::with_file("token.json", "{not json"));
        let store = store_with(fs.clone());

        let err = store.retrieve_tokens().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenCorrupted { .. }));
        assert!(fs.get("token.json").is_none());
    }

    #[tokio::test]
    async fn test_reads_authorized_user_layout() {
        let fs = Arc::new(MemoryFs::with_file(
            "token.json",
            r#"{"token": "ya29.a0Af", "refresh_token": "1//0gRt", "token_uri": "https://oauth2.googleapis.com/token",
                "client_id": "id.apps.googleusercontent.com", "client_secret": "s",
                "scopes": ["https://www.googleapis.com/auth/drive"], "universe_domain": "googleapis.com",
                "account": "", "expiry": "2023-01-01T12:00:00.123456Z"}"#,
        ));
        let store = store_with(fs.clone());

        let tokens = store.retrieve_tokens().await.unwrap().unwrap();
        assert_eq!(tokens.access_token, "ya29.a0Af");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//0gRt"));
        assert_eq!(tokens.expires_at.timestamp(), 1_672_574_400);
        assert!(tokens.is_expired());
        assert!(fs.get("token.json").is_some());
    }

    #[tokio::test]
    async fn test_authorized_user_without_expiry_is_expired() {
        let fs = Arc::new(MemoryFs::with_file(
            "token.json",
            r#"{"token": "ya29.a0Af", "refresh_token": "1//0gRt"}"#,
        ));

        let tokens = store_with(fs).retrieve_tokens().await.unwrap().unwrap();
        assert!(tokens.is_expired());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let fs = Arc::new(MemoryFs::default());
        let store = store_with(fs.clone());

        store.delete_tokens().await.unwrap();

        let tokens = OAuthTokens::new("a".to_string(), None, 60);
        store.store_tokens(&tokens).await.unwrap();
        store.delete_tokens().await.unwrap();

        assert!(fs.get("token.json").is_none());
    }
}
