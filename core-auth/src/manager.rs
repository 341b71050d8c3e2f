//! # Authentication Manager
//!
//! Produces a Google Drive access token for the uploader.
//!
//! ## Overview
//!
//! [`AuthManager::authorize`] walks the usual installed-app ladder:
//!
//! - cached token still valid: use it
//! - cached token expired and a refresh token is present: refresh once,
//!   re-cache, use it
//! - otherwise (or when the refresh is rejected): interactive flow through
//!   the loopback redirect, bounded by a timeout
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::AuthManager;
//! use std::sync::Arc;
//! # use bridge_traits::{http::HttpClient, storage::FileSystemAccess};
//! # async fn example(http: Arc<dyn HttpClient>, fs: Arc<dyn FileSystemAccess>) -> core_auth::Result<()> {
//! let manager = AuthManager::new(http, fs, "credentials.json", "token.json");
//! let access_token = manager.authorize().await?;
//! # Ok(())
//! # }
//! ```

use crate::client_secrets::ClientSecrets;
use crate::error::{AuthError, Result};
use crate::loopback::LoopbackReceiver;
use crate::oauth::{OAuthConfig, OAuthFlowManager};
use crate::token_store::TokenStore;
use crate::types::OAuthTokens;
use bridge_traits::{http::HttpClient, storage::FileSystemAccess};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{info, instrument, warn};

/// Full read/write Drive access
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// How long the interactive flow waits for the browser redirect
const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// Buffer time before token expiration to trigger refresh
const TOKEN_REFRESH_BUFFER: Duration = Duration::from_secs(300);

/// Shows the authorization URL to the user
pub type UrlPresenter = Arc<dyn Fn(&str) + Send + Sync>;

pub struct AuthManager {
    http_client: Arc<dyn HttpClient>,
    fs: Arc<dyn FileSystemAccess>,
    token_store: TokenStore,
    client_secrets_path: PathBuf,
    scopes: Vec<String>,
    auth_timeout: Duration,
    present_url: UrlPresenter,
}

impl AuthManager {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        fs: Arc<dyn FileSystemAccess>,
        client_secrets_path: impl Into<PathBuf>,
        token_cache_path: impl Into<PathBuf>,
    ) -> Self {
        let token_store = TokenStore::new(Arc::clone(&fs), token_cache_path);

        Self {
            http_client,
            fs,
            token_store,
            client_secrets_path: client_secrets_path.into(),
            scopes: vec![DRIVE_SCOPE.to_string()],
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            present_url: Arc::new(|url: &str| {
                println!(
                    "Please visit this URL to authorize this application: {}",
                    url
                );
            }),
        }
    }

    /// Override how long to wait for the browser redirect
    pub fn with_timeout(mut self, auth_timeout: Duration) -> Self {
        self.auth_timeout = auth_timeout;
        self
    }

    /// Replace the default stdout prompt for the authorization URL
    pub fn with_url_presenter(mut self, present: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.present_url = Arc::new(present);
        self
    }

    /// Obtain a valid access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SecretsMissing`] when a refresh or the interactive flow
    ///   is needed and the client-secrets file does not exist
    /// - [`AuthError::CallbackTimeout`] when the user does not finish the
    ///   browser flow in time
    /// - token endpoint and loopback failures of the interactive flow
    #[instrument(skip(self))]
    pub async fn authorize(&self) -> Result<String> {
        let cached = match self.token_store.retrieve_tokens().await {
            Ok(tokens) => tokens,
            Err(AuthError::TokenCorrupted { reason }) => {
                warn!(%reason, "Discarded corrupted token cache");
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(tokens) = &cached {
            if !tokens.is_expired_with_buffer(TOKEN_REFRESH_BUFFER.as_secs() as i64) {
                info!("Using cached Google Drive credentials");
                return Ok(tokens.access_token.clone());
            }
        }

        let secrets = ClientSecrets::load(self.fs.as_ref(), &self.client_secrets_path).await?;

        if let Some(refresh_token) = cached.and_then(|t| t.refresh_token) {
            info!("Cached token expired, refreshing");

            let redirect_uri = secrets
                .redirect_uris
                .first()
                .cloned()
                .unwrap_or_else(|| "http://localhost".to_string());
            let flow = OAuthFlowManager::new(
                self.oauth_config(&secrets, redirect_uri),
                Arc::clone(&self.http_client),
            );

            match flow.refresh_access_token(&refresh_token).await {
                Ok(tokens) => {
                    self.cache_tokens(&tokens).await;
                    return Ok(tokens.access_token);
                }
                Err(e) => {
                    warn!(error = %e, "Token refresh failed, falling back to interactive authorization");
                }
            }
        }

        self.run_interactive_flow(&secrets).await
    }

    async fn run_interactive_flow(&self, secrets: &ClientSecrets) -> Result<String> {
        let receiver = LoopbackReceiver::bind().await?;
        let flow = OAuthFlowManager::new(
            self.oauth_config(secrets, receiver.redirect_uri()),
            Arc::clone(&self.http_client),
        );

        let (auth_url, verifier) = flow.build_auth_url()?;
        (self.present_url)(&auth_url);

        let callback = timeout(self.auth_timeout, receiver.wait_for_callback())
            .await
            .map_err(|_| AuthError::CallbackTimeout {
                seconds: self.auth_timeout.as_secs(),
            })??;

        let tokens = flow
            .exchange_code(&callback.code, &callback.state, &verifier)
            .await?;

        self.cache_tokens(&tokens).await;
        info!("Google Drive authorization completed");
        Ok(tokens.access_token)
    }

    /// A token that cannot be cached is still good for this run.
    async fn cache_tokens(&self, tokens: &OAuthTokens) {
        if let Err(e) = self.token_store.store_tokens(tokens).await {
            warn!(error = %e, "Failed to cache Google Drive tokens");
        }
    }

    fn oauth_config(&self, secrets: &ClientSecrets, redirect_uri: String) -> OAuthConfig {
        OAuthConfig {
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            redirect_uri,
            scopes: self.scopes.clone(),
            auth_url: secrets
                .auth_uri
                .clone()
                .unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: secrets
                .token_uri
                .clone()
                .unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
        }
    }
}
