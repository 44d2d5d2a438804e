//! Interactive seller sign-in.
//!
//! Opens the eBay consent page and waits on a local axum listener for the
//! redirect carrying the authorization code. eBay redirects to the RuName's
//! accept URL, which must forward to `/oauth/callback` on the callback port.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use rand::{Rng, distributions::Alphanumeric};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Endpoints, Settings};
use crate::credentials::CredentialStore;

use super::error::{AuthError, AuthResult};
use super::token::{TokenManager, TokenSource, USER_SCOPES, UserIdentity};

pub const CALLBACK_PATH: &str = "/oauth/callback";

/// Query parameters eBay appends to the redirect.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token_source: TokenSource,
    pub identity: Option<UserIdentity>,
}

type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

/// Router that hands the first callback to `tx`.
pub fn callback_router(tx: oneshot::Sender<CallbackParams>) -> Router {
    let slot: CallbackSlot = Arc::new(Mutex::new(Some(tx)));
    Router::new()
        .route(CALLBACK_PATH, get(handle_callback))
        .with_state(slot)
}

async fn handle_callback(
    State(slot): State<CallbackSlot>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    let page = if params.error.is_some() {
        "<h1>eBay sign-in was declined</h1><p>You can close this window.</p>"
    } else {
        "<h1>eBay sign-in complete</h1><p>You can close this window and return to your assistant.</p>"
    };

    let sender = slot.lock().ok().and_then(|mut guard| guard.take());
    match sender {
        Some(tx) => {
            let _ = tx.send(params);
        }
        None => warn!("Ignoring repeated OAuth callback"),
    }

    Html(page)
}

/// Consent page URL for the user scopes.
pub fn authorization_url(
    endpoints: &Endpoints,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> AuthResult<Url> {
    Url::parse_with_params(
        &endpoints.authorize_url(),
        &[
            ("client_id", client_id.to_string()),
            ("redirect_uri", redirect_uri.to_string()),
            ("response_type", "code".to_string()),
            ("scope", USER_SCOPES.join(" ")),
            ("state", state.to_string()),
        ],
    )
    .map_err(|e| AuthError::InvalidResponse {
        message: format!("cannot build the consent URL: {e}"),
    })
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub struct LoginFlow<'a, S> {
    tokens: &'a TokenManager<S>,
    settings: &'a Settings,
    open_browser: bool,
}

impl<'a, S: CredentialStore> LoginFlow<'a, S> {
    pub fn new(tokens: &'a TokenManager<S>, settings: &'a Settings) -> Self {
        Self {
            tokens,
            settings,
            open_browser: true,
        }
    }

    /// Only report the consent URL; do not launch a browser.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Bind the callback port and run the sign-in.
    pub async fn run<F>(&self, on_url: F) -> AuthResult<LoginOutcome>
    where
        F: FnOnce(&str),
    {
        if self.settings.redirect_uri.is_none() {
            return Err(AuthError::MissingRedirectUri);
        }
        let port = self.settings.callback_port;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| AuthError::CallbackBind {
                port,
                message: e.to_string(),
            })?;
        self.run_with_listener(listener, on_url).await
    }

    /// Run the sign-in against an already bound listener.
    pub async fn run_with_listener<F>(
        &self,
        listener: TcpListener,
        on_url: F,
    ) -> AuthResult<LoginOutcome>
    where
        F: FnOnce(&str),
    {
        let redirect_uri = self
            .settings
            .redirect_uri
            .as_deref()
            .ok_or(AuthError::MissingRedirectUri)?;
        let creds = self.tokens.credentials()?;
        let (client_id, _) = creds
            .client_pair()
            .ok_or(AuthError::MissingClientCredentials {
                operation: "signing in",
            })?;

        let state = random_state();
        let url = authorization_url(self.tokens.endpoints(), client_id, redirect_uri, &state)?;

        let (tx, rx) = oneshot::channel();
        let shutdown = CancellationToken::new();
        let server = {
            let shutdown = shutdown.clone();
            let app = callback_router(tx);
            tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown.cancelled_owned())
                    .await
            })
        };

        info!(url = %url, "Waiting for eBay sign-in");
        on_url(url.as_str());
        if self.open_browser {
            if let Err(e) = open::that_detached(url.as_str()) {
                warn!(error = %e, "Could not open a browser; open the URL manually");
            }
        }

        let waited = tokio::time::timeout(self.settings.login_timeout, rx).await;
        shutdown.cancel();
        let _ = server.await;

        let params = match waited {
            Err(_) => {
                return Err(AuthError::LoginTimeout {
                    seconds: self.settings.login_timeout.as_secs(),
                });
            }
            Ok(Err(_)) => {
                return Err(AuthError::InvalidResponse {
                    message: "callback listener stopped before a redirect arrived".to_string(),
                });
            }
            Ok(Ok(params)) => params,
        };

        let code = validate_callback(params, &state)?;
        let token = self.tokens.exchange_code(&code, redirect_uri).await?;

        let identity = match self.tokens.fetch_identity(&token.value).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(error = %e, "Signed in, but the identity lookup failed");
                None
            }
        };

        Ok(LoginOutcome {
            token_source: token.source,
            identity,
        })
    }
}

/// Extract the authorization code, rejecting declines and foreign states.
pub fn validate_callback(params: CallbackParams, expected_state: &str) -> AuthResult<String> {
    if let Some(error) = params.error {
        return Err(AuthError::LoginDeclined {
            error,
            description: params.error_description.unwrap_or_default(),
        });
    }
    if params.state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::InvalidResponse {
            message: "OAuth callback carried no authorization code".to_string(),
        })
}
