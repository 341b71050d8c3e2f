//! # Authentication Module
//!
//! OAuth 2.0 installed-application flow for Google Drive.
//!
//! ## Overview
//!
//! The uploader needs a Drive access token. [`AuthManager::authorize`]
//! produces one in the cheapest way available:
//!
//! 1. a still-valid token from the local cache file (`token.json`),
//! 2. a refresh of an expired cached token,
//! 3. the interactive flow: the user opens the printed authorization URL,
//!    Google redirects to a one-shot loopback listener, the code is
//!    exchanged (PKCE S256) and the result is cached.
//!
//! Client id and secret come from the Google client-secrets file
//! (`credentials.json`).

pub mod client_secrets;
pub mod error;
pub mod loopback;
pub mod manager;
pub mod oauth;
pub mod token_store;
pub mod types;

pub use client_secrets::ClientSecrets;
pub use error::{AuthError, Result};
pub use loopback::{CallbackParams, LoopbackReceiver};
pub use manager::{AuthManager, DRIVE_SCOPE};
pub use oauth::{OAuthConfig, OAuthFlowManager, PkceVerifier};
pub use token_store::TokenStore;
pub use types::OAuthTokens;

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::storage::FileSystemAccess;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// In-memory file system keyed by path
    #[derive(Default)]
    pub struct MemoryFs {
        pub files: Mutex<HashMap<PathBuf, Bytes>>,
    }

    impl MemoryFs {
        pub fn with_file(path: &str, contents: &str) -> Self {
            let fs = Self::default();
            fs.put(path, contents);
            fs
        }

        pub fn put(&self, path: &str, contents: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), Bytes::from(contents.to_string()));
        }

        pub fn get(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .unwrap()
                .get(Path::new(path))
                .map(|b| String::from_utf8_lossy(b).into_owned())
        }
    }

    fn not_found(path: &Path) -> BridgeError {
        BridgeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        ))
    }

    #[async_trait]
    impl FileSystemAccess for MemoryFs {
        async fn exists(&self, path: &Path) -> BridgeResult<bool> {
            Ok(self.files.lock().unwrap().contains_key(path))
        }

        async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| not_found(path))
        }

        async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
            self.files.lock().unwrap().insert(path.to_path_buf(), data);
            Ok(())
        }

        async fn delete_file(&self, path: &Path) -> BridgeResult<()> {
            self.files
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| not_found(path))
        }
    }
}
