//! OAuth 2.0 Authorization Flow Manager with PKCE Support
//!
//! Implements RFC 6749 (OAuth 2.0) and RFC 7636 (PKCE) for the installed
//! application flow.
//!
//! # Overview
//!
//! The OAuth flow manager handles:
//! - Building authorization URLs with PKCE challenge
//! - Exchanging authorization codes for tokens
//! - Refreshing access tokens
//! - State verification for CSRF protection
//!
//! Every token endpoint call is a single attempt; failures are returned to
//! the caller.
//!
//! # Security
//!
//! Never logs sensitive values (tokens, codes, verifiers).
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthFlowManager, OAuthConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = OAuthConfig {
//!     client_id: "your-client-id".to_string(),
//!     client_secret: Some("your-client-secret".to_string()),
//!     redirect_uri: "http://127.0.0.1:8080/".to_string(),
//!     scopes: vec!["https://www.googleapis.com/auth/drive".to_string()],
//!     auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
//!     token_url: "https://oauth2.googleapis.com/token".to_string(),
//! };
//!
//! let flow_manager = OAuthFlowManager::new(config, http_client);
//! let (auth_url, pkce_verifier) = flow_manager.build_auth_url()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// OAuth 2.0 client configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret (optional for public clients)
    pub client_secret: Option<String>,
    /// Redirect URI for OAuth callback
    pub redirect_uri: String,
    /// List of OAuth scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
}

/// PKCE (Proof Key for Code Exchange) verifier.
///
/// # Security
///
/// The verifier must never be sent to the authorization server. Only the
/// challenge derived from it is.
#[derive(Clone)]
pub struct PkceVerifier {
    /// The code verifier (base64-url-encoded random string)
    verifier: String,
    /// The state parameter for CSRF protection
    state: String,
}

impl PkceVerifier {
    /// Create a new PKCE verifier with cryptographically secure random values.
    ///
    /// Generates:
    /// - A 32-byte random code verifier (base64-url-encoded)
    /// - A 16-byte random state parameter (base64-url-encoded)
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();

        let mut verifier_bytes = [0u8; 32];
        rng.fill(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        let mut state_bytes = [0u8; 16];
        rng.fill(&mut state_bytes);
        let state = URL_SAFE_NO_PAD.encode(state_bytes);

        Self { verifier, state }
    }

    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Compute the code challenge from the verifier.
    ///
    /// Uses S256 method: BASE64URL(SHA256(code_verifier))
    pub fn challenge(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.verifier.as_bytes());
        let hash = hasher.finalize();
        URL_SAFE_NO_PAD.encode(hash)
    }
}

impl Default for PkceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PkceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceVerifier")
            .field("verifier", &"[REDACTED]")
            .field("state", &self.state)
            .finish()
    }
}

/// OAuth 2.0 flow manager.
pub struct OAuthFlowManager {
    config: OAuthConfig,
    http_client: Arc<dyn HttpClient>,
}

impl OAuthFlowManager {
    pub fn new(config: OAuthConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the authorization URL with PKCE challenge.
    ///
    /// Returns the URL the user should visit and the verifier that must be
    /// kept for [`exchange_code`](Self::exchange_code).
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization URL cannot be parsed.
    #[instrument(skip(self))]
    pub fn build_auth_url(&self) -> Result<(String, PkceVerifier)> {
        let verifier = PkceVerifier::new();
        let challenge = verifier.challenge();

        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::Other(format!("Invalid auth URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", &self.config.scopes.join(" "));
            query.append_pair("state", verifier.state());
            query.append_pair("code_challenge", &challenge);
            query.append_pair("code_challenge_method", "S256");
            // Without these Google omits the refresh token on re-consent.
            query.append_pair("access_type", "offline");
            query.append_pair("prompt", "consent");
        }

        debug!("Built authorization URL");

        Ok((url.to_string(), verifier))
    }

    /// Exchange an authorization code for OAuth tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state doesn't match (CSRF protection)
    /// - The token endpoint rejects the code
    /// - The request fails at the transport level
    #[instrument(skip(self, code, verifier))]
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &str,
        verifier: &PkceVerifier,
    ) -> Result<OAuthTokens> {
        if state != verifier.state() {
            warn!("OAuth state mismatch in authorization callback");
            return Err(AuthError::StateMismatch {
                expected: verifier.state().to_string(),
                actual: state.to_string(),
            });
        }

        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", self.config.redirect_uri.as_str());
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("code_verifier", verifier.verifier());

        if let Some(ref client_secret) = self.config.client_secret {
            params.insert("client_secret", client_secret.as_str());
        }

        debug!("Exchanging authorization code for tokens");

        let response = self
            .post_token_request(&params)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = error_text(&response);

            warn!(status, "Token exchange failed while exchanging authorization code");

            return Err(AuthError::InvalidAuthCode(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::Other(format!("Failed to parse token response: {}", e)))?;

        info!(
            "Successfully exchanged code for tokens (expires in {}s)",
            token_response.expires_in
        );

        Ok(OAuthTokens::new(
            token_response.access_token,
            token_response.refresh_token,
            token_response.expires_in,
        ))
    }

    /// Refresh an access token using a refresh token.
    ///
    /// Google usually does not rotate the refresh token; when the response
    /// omits it, the one passed in is kept.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenRefreshFailed`] on any transport failure or
    /// non-success status.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens> {
        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", self.config.client_id.as_str());

        if let Some(ref client_secret) = self.config.client_secret {
            params.insert("client_secret", client_secret.as_str());
        }

        debug!("Refreshing access token");

        let response = self
            .post_token_request(&params)
            .await
            .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = error_text(&response);

            warn!(status, "Token refresh rejected by token endpoint");

            return Err(AuthError::TokenRefreshFailed(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenRefreshFailed(format!("Failed to parse token response: {}", e)))?;

        info!(
            "Successfully refreshed token (expires in {}s)",
            token_response.expires_in
        );

        Ok(OAuthTokens::new(
            token_response.access_token,
            token_response
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            token_response.expires_in,
        ))
    }

    async fn post_token_request(
        &self,
        params: &HashMap<&str, &str>,
    ) -> std::result::Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        let encoded_body = serde_urlencoded::to_string(params)?;

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        Ok(self.http_client.execute(request).await?)
    }
}

fn error_text(response: &HttpResponse) -> String {
    response
        .text()
        .unwrap_or_else(|_| "Unable to read error response".to_string())
}

/// JSON body returned by the token endpoint.
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: Some("secret".to_string()),
            redirect_uri: "http://127.0.0.1:8080/".to_string(),
            scopes: vec!["scope1".to_string(), "scope2".to_string()],
            auth_url: "https://provider.com/auth".to_string(),
            token_url: "https://provider.com/token".to_string(),
        }
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_pkce_verifier_generation() {
        let verifier = PkceVerifier::new();

        assert!(!verifier.verifier().is_empty());
        assert!(!verifier.state().is_empty());
        assert_eq!(verifier.challenge(), verifier.challenge());

        let verifier2 = PkceVerifier::new();
        assert_ne!(verifier.verifier(), verifier2.verifier());
        assert_ne!(verifier.state(), verifier2.state());
        assert_ne!(verifier.challenge(), verifier2.challenge());
    }

    #[test]
    fn test_pkce_challenge_matches_rfc7636_example() {
        // RFC 7636 Appendix B
        let verifier = PkceVerifier {
            verifier: "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string(),
            state: "state".to_string(),
        };

        assert_eq!(
            verifier.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_pkce_debug_hides_verifier() {
        let verifier = PkceVerifier::new();
        let debug = format!("{:?}", verifier);
        assert!(!debug.contains(verifier.verifier()));
    }

    #[test]
    fn test_build_auth_url() {
        let manager = OAuthFlowManager::new(test_config(), Arc::new(MockHttpClient::new()));
        let (url, verifier) = manager.build_auth_url().unwrap();

        assert!(url.starts_with("https://provider.com/auth?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2F"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=scope1+scope2") || url.contains("scope=scope1%20scope2"));
        assert!(url.contains(&format!("state={}", verifier.state())));
        assert!(url.contains(&format!("code_challenge={}", verifier.challenge())));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("access_type=offline"));
    }

    #[test]
    fn test_build_auth_url_invalid_url() {
        let mut config = test_config();
        config.auth_url = "not a valid url".to_string();

        let manager = OAuthFlowManager::new(config, Arc::new(MockHttpClient::new()));
        assert!(manager.build_auth_url().is_err());
    }

    #[tokio::test]
    async fn test_exchange_code_rejects_state_mismatch() {
        let manager = OAuthFlowManager::new(test_config(), Arc::new(MockHttpClient::new()));
        let verifier = PkceVerifier::new();

        let result = manager.exchange_code("code", "forged", &verifier).await;
        assert!(matches!(result, Err(AuthError::StateMismatch { .. })));
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let verifier = PkceVerifier::new();
        let expected_verifier = verifier.verifier().to_string();

        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(move |req| {
                let body = req
                    .body
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).into_owned())
                    .unwrap_or_default();
                req.method == HttpMethod::Post
                    && req.url == "https://provider.com/token"
                    && body.contains("grant_type=authorization_code")
                    && body.contains("code=auth-code")
                    && body.contains(&format!("code_verifier={}", expected_verifier))
                    && body.contains("client_secret=secret")
            })
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    200,
                    r#"{"access_token":"ya29.new","refresh_token":"1//r","expires_in":3599}"#,
                ))
            });

        let manager = OAuthFlowManager::new(test_config(), Arc::new(mock));
        let state = verifier.state().to_string();
        let tokens = manager
            .exchange_code("auth-code", &state, &verifier)
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "ya29.new");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//r"));
        assert!(!tokens.is_expired());
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(400, r#"{"error":"invalid_grant"}"#)));

        let manager = OAuthFlowManager::new(test_config(), Arc::new(mock));
        let verifier = PkceVerifier::new();
        let state = verifier.state().to_string();

        let result = manager.exchange_code("bad", &state, &verifier).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthCode(msg)) if msg.contains("400")));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_when_not_rotated() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.body
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).contains("grant_type=refresh_token"))
                    .unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(json_response(200, r#"{"access_token":"ya29.fresh"}"#)));

        let manager = OAuthFlowManager::new(test_config(), Arc::new(mock));
        let tokens = manager.refresh_access_token("1//keep").await.unwrap();

        assert_eq!(tokens.access_token, "ya29.fresh");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//keep"));
    }

    #[tokio::test]
    async fn test_refresh_is_single_attempt() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(503, "unavailable")));

        let manager = OAuthFlowManager::new(test_config(), Arc::new(mock));
        let result = manager.refresh_access_token("1//r").await;

        assert!(matches!(result, Err(AuthError::TokenRefreshFailed(_))));
    }

    #[tokio::test]
    async fn test_refresh_transport_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("Connection failed".to_string())));

        let manager = OAuthFlowManager::new(test_config(), Arc::new(mock));
        let result = manager.refresh_access_token("1//r").await;

        assert!(matches!(result, Err(AuthError::TokenRefreshFailed(msg)) if msg.contains("Connection failed")));
    }

    #[test]
    fn test_token_response_deserialization_minimal() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token": "token"}"#).unwrap();
        assert_eq!(response.access_token, "token");
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.expires_in, 3600);
    }
}
