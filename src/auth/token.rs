//! Access token lifecycle.
//!
//! The stored user token is used as long as eBay accepts it. When a caller
//! sees a 401 it asks for a refresh, which trades the stored refresh token
//! for a new access token and writes both back to the credential store.
//! Without a user token, an application token from the client-credentials
//! grant is used instead and cached for the life of the process.

use std::sync::{Arc, RwLock};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::Endpoints;
use crate::credentials::{CredentialKey, CredentialStore, Credentials};

use super::error::{AuthError, AuthResult};

/// Scope requested for application tokens.
pub const APPLICATION_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Scopes requested when a seller signs in.
pub const USER_SCOPES: [&str; 3] = [
    "https://api.ebay.com/oauth/api_scope",
    "https://api.ebay.com/oauth/api_scope/sell.inventory",
    "https://api.ebay.com/oauth/api_scope/commerce.identity.readonly",
];

/// Where an access token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Seller token from the authorization-code or refresh grant.
    User,
    /// Application token from the client-credentials grant.
    Application,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub source: TokenSource,
}

impl AccessToken {
    /// Short prefix that is safe to log.
    pub fn redacted(&self) -> String {
        redact(&self.value)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &self.redacted())
            .field("source", &self.source)
            .finish()
    }
}

pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(10).collect();
    format!("{prefix}... ({} chars)", token.chars().count())
}

/// Body of a successful eBay token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub refresh_token_expires_in: Option<u64>,
}

/// Seller account behind a user token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

pub struct TokenManager<S> {
    store: Arc<S>,
    http: Client,
    endpoints: Endpoints,
    application_token: RwLock<Option<String>>,
}

impl<S: CredentialStore> TokenManager<S> {
    pub fn new(store: Arc<S>, http: Client, endpoints: Endpoints) -> Self {
        Self {
            store,
            http,
            endpoints,
            application_token: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn credentials(&self) -> AuthResult<Credentials> {
        Ok(self.store.snapshot()?)
    }

    /// Current access token: the stored user token, else an application
    /// token when client credentials are configured.
    pub async fn access_token(&self) -> AuthResult<AccessToken> {
        let creds = self.credentials()?;

        if let Some(value) = creds.user_access_token {
            debug!(token = %redact(&value), "Using stored user access token");
            return Ok(AccessToken {
                value,
                source: TokenSource::User,
            });
        }

        if creds.client_pair().is_none() {
            warn!("No user token and no client credentials configured");
            return Err(AuthError::NoCredentials);
        }

        if let Some(value) = self.cached_application_token() {
            debug!(token = %redact(&value), "Using cached application token");
            return Ok(AccessToken {
                value,
                source: TokenSource::Application,
            });
        }

        self.acquire_application_token(&creds).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Without a refresh token the application token is re-acquired instead,
    /// when client credentials allow it and no user token is stored. A stale
    /// user token is never swapped for an application token: seller calls
    /// would be rejected again. Failures are returned to the caller without
    /// any internal retry.
    pub async fn refresh_access_token(&self) -> AuthResult<AccessToken> {
        let creds = self.credentials()?;

        let Some(refresh_token) = creds.user_refresh_token.clone() else {
            if creds.user_access_token.is_none() && creds.client_pair().is_some() {
                info!("No refresh token stored; renewing the application token");
                self.clear_application_token();
                return self.acquire_application_token(&creds).await;
            }
            error!("Cannot refresh: no refresh token stored");
            return Err(AuthError::NoRefreshToken);
        };

        let missing = AuthError::MissingClientCredentials {
            operation: "refreshing the access token",
        };
        let (client_id, client_secret) = creds.client_pair().ok_or(missing)?;

        info!(refresh_token = %redact(&refresh_token), "Refreshing eBay access token");
        let response = self
            .http
            .post(self.endpoints.token_url())
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Token refresh request failed");
                AuthError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "eBay refused the refresh token");
            return Err(AuthError::RefreshDenied {
                status: status.as_u16(),
                body,
            });
        }

        let tokens: TokenResponse = response.json().await?;

        let mut updates = vec![(CredentialKey::UserAccessToken, tokens.access_token.clone())];
        match tokens.refresh_token {
            Some(new_refresh) if new_refresh != refresh_token => {
                info!(refresh_token = %redact(&new_refresh), "eBay issued a new refresh token");
                updates.push((CredentialKey::UserRefreshToken, new_refresh));
            }
            _ => debug!("Refresh token unchanged"),
        }
        self.store.set_many(&updates)?;

        info!(token = %redact(&tokens.access_token), "Access token refreshed");
        Ok(AccessToken {
            value: tokens.access_token,
            source: TokenSource::User,
        })
    }

    /// Trade an authorization code for user tokens and store them.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AuthResult<AccessToken> {
        let creds = self.credentials()?;
        let missing = AuthError::MissingClientCredentials {
            operation: "exchanging the authorization code",
        };
        let (client_id, client_secret) = creds.client_pair().ok_or(missing)?;

        let tokens = self
            .token_grant(
                "authorization_code",
                client_id,
                client_secret,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await?;

        let mut updates = vec![(CredentialKey::UserAccessToken, tokens.access_token.clone())];
        if let Some(refresh) = tokens.refresh_token {
            updates.push((CredentialKey::UserRefreshToken, refresh));
        }
        self.store.set_many(&updates)?;

        info!(token = %redact(&tokens.access_token), "Stored user tokens from sign-in");
        Ok(AccessToken {
            value: tokens.access_token,
            source: TokenSource::User,
        })
    }

    /// Look up the seller behind `token` and store the id and username.
    pub async fn fetch_identity(&self, token: &str) -> AuthResult<UserIdentity> {
        let response = self
            .http
            .get(self.endpoints.identity_url())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Identity {
                status: status.as_u16(),
                body,
            });
        }

        let identity: UserIdentity = response.json().await?;

        let mut updates = vec![(CredentialKey::UserId, identity.user_id.clone())];
        if let Some(username) = &identity.username {
            updates.push((CredentialKey::UserName, username.clone()));
        }
        self.store.set_many(&updates)?;

        info!(user_id = %identity.user_id, username = ?identity.username, "Stored eBay identity");
        Ok(identity)
    }

    async fn acquire_application_token(&self, creds: &Credentials) -> AuthResult<AccessToken> {
        let (client_id, client_secret) = creds.client_pair().ok_or(AuthError::NoCredentials)?;

        info!("Requesting application token (client credentials)");
        let tokens = self
            .token_grant(
                "client_credentials",
                client_id,
                client_secret,
                &[
                    ("grant_type", "client_credentials"),
                    ("scope", APPLICATION_SCOPE),
                ],
            )
            .await?;

        if let Ok(mut cached) = self.application_token.write() {
            *cached = Some(tokens.access_token.clone());
        }

        Ok(AccessToken {
            value: tokens.access_token,
            source: TokenSource::Application,
        })
    }

    async fn token_grant(
        &self,
        grant: &'static str,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> AuthResult<TokenResponse> {
        let response = self
            .http
            .post(self.endpoints.token_url())
            .basic_auth(client_id, Some(client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(grant, status = status.as_u16(), %body, "Token grant refused");
            return Err(AuthError::GrantDenied {
                grant,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    fn cached_application_token(&self) -> Option<String> {
        self.application_token
            .read()
            .ok()
            .and_then(|cached| cached.clone())
    }

    fn clear_application_token(&self) {
        if let Ok(mut cached) = self.application_token.write() {
            *cached = None;
        }
    }
}
