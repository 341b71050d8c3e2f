//! One-shot loopback redirect receiver
//!
//! Binds an ephemeral port on 127.0.0.1 and serves a small axum router
//! until the browser follows the OAuth redirect. The first request to `/`
//! carrying `code` or `error` ends the flow; anything else (a browser
//! fetching `/favicon.ico`, an idle preconnect) gets a 404 or is left to the
//! server without blocking the redirect.

use crate::error::{AuthError, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long open connections may drain once the redirect is in
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

const SUCCESS_PAGE: &str = "<html><body><p>The authentication flow has completed. \
You may close this window.</p></body></html>";

const FAILURE_PAGE: &str = "<html><body><p>Authorization failed. \
Return to the terminal for details.</p></body></html>";

/// Parameters delivered on the redirect URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

type Outcome = Result<CallbackParams>;

#[derive(Clone)]
struct RedirectState {
    outcome: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

/// Aborts the server task when the wait is abandoned, e.g. on timeout.
struct ServerTask(JoinHandle<std::io::Result<()>>);

impl Drop for ServerTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct LoopbackReceiver {
    listener: TcpListener,
    addr: SocketAddr,
}

impl LoopbackReceiver {
    /// Bind an ephemeral port on the loopback interface.
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(|e| AuthError::Loopback(format!("Failed to bind loopback port: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::Loopback(e.to_string()))?;

        debug!(port = addr.port(), "Loopback receiver listening");
        Ok(Self { listener, addr })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Redirect URI to register with the authorization request
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/", self.addr.port())
    }

    /// Serve until a request carrying the authorization result arrives.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AuthorizationDenied`] when the redirect carries `error`
    /// - [`AuthError::Loopback`] when the server stops before the redirect
    pub async fn wait_for_callback(self) -> Result<CallbackParams> {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route("/", get(handle_redirect))
            .fallback(not_found)
            .with_state(RedirectState {
                outcome: Arc::new(Mutex::new(Some(outcome_tx))),
            });

        let listener = self.listener;
        let mut server = ServerTask(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        }));

        let outcome = outcome_rx.await.map_err(|_| {
            AuthError::Loopback("Loopback server stopped before the redirect arrived".to_string())
        })?;

        let _ = shutdown_tx.send(());
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server.0).await {
            Ok(Ok(Err(e))) => warn!(error = %e, "Loopback server failed while shutting down"),
            Ok(_) => {}
            Err(_) => debug!("Loopback connections still open at shutdown"),
        }

        outcome
    }
}

async fn handle_redirect(
    State(state): State<RedirectState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(outcome) = callback_outcome(&params) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let page = if outcome.is_ok() {
        SUCCESS_PAGE
    } else {
        FAILURE_PAGE
    };

    let sender = match state.outcome.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    match sender {
        Some(tx) => {
            let _ = tx.send(outcome);
        }
        None => debug!("Redirect received after the flow completed"),
    }

    Html(page).into_response()
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// `None` when the request carries no authorization result at all.
fn callback_outcome(params: &HashMap<String, String>) -> Option<Outcome> {
    if let Some(error) = params.get("error") {
        return Some(Err(AuthError::AuthorizationDenied(error.clone())));
    }

    let code = params.get("code")?;
    Some(Ok(CallbackParams {
        code: code.clone(),
        state: params.get("state").cloned().unwrap_or_default(),
    }))
}
