//! Token-injecting executor for eBay calls.
//!
//! `execute` runs a caller-supplied operation with the current access token.
//! A 401 from eBay triggers exactly one refresh and one retry; any other
//! failure is returned untouched. A second 401, or a failed refresh, ends the
//! call with [`ApiError::ReauthRequired`] so the caller can ask the seller to
//! sign in again.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::{AuthError, TokenManager};
use crate::config::Settings;
use crate::credentials::CredentialStore;

use super::client::{EbayClient, build_http_client};
use super::error::{ApiError, ApiResult};

pub struct ApiExecutor<S> {
    tokens: TokenManager<S>,
    client: EbayClient,
}

impl<S: CredentialStore> ApiExecutor<S> {
    pub fn new(tokens: TokenManager<S>, client: EbayClient) -> Self {
        Self { tokens, client }
    }

    /// Executor for the configured endpoints and request timeout.
    pub fn from_settings(store: Arc<S>, settings: &Settings) -> ApiResult<Self> {
        let http = build_http_client(settings.request_timeout)?;
        let tokens = TokenManager::new(store, http.clone(), settings.endpoints.clone());
        let client = EbayClient::new(http, settings.endpoints.api_base.clone());
        Ok(Self::new(tokens, client))
    }

    pub fn tokens(&self) -> &TokenManager<S> {
        &self.tokens
    }

    pub fn client(&self) -> &EbayClient {
        &self.client
    }

    /// Run `operation` with a valid token, refreshing once on 401.
    pub async fn execute<T, F, Fut>(&self, operation_name: &str, operation: F) -> ApiResult<T>
    where
        F: Fn(String, EbayClient) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!(operation = operation_name, error = %e, "No access token available");
                return Err(acquisition_error(e));
            }
        };
        info!(
            operation = operation_name,
            source = ?token.source,
            token = %token.redacted(),
            "Calling eBay"
        );

        let first = operation(token.value, self.client.clone()).await;
        let err = match first {
            Err(err) if err.is_unauthorized() => err,
            other => {
                log_outcome(operation_name, &other, false);
                return other;
            }
        };

        warn!(operation = operation_name, error = %err, "eBay rejected the token; refreshing");
        let fresh = match self.tokens.refresh_access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!(operation = operation_name, error = %e, "Token refresh failed");
                return Err(refresh_error(e));
            }
        };

        info!(
            operation = operation_name,
            token = %fresh.redacted(),
            "Retrying with refreshed token"
        );
        let retried = operation(fresh.value, self.client.clone()).await;
        let result = match retried {
            Err(err) if err.is_unauthorized() => Err(ApiError::ReauthRequired {
                reason: format!("the refreshed token was also rejected: {err}"),
            }),
            other => other,
        };
        log_outcome(operation_name, &result, true);
        result
    }
}

/// Shared handle used by the MCP tool structs.
pub type SharedExecutor<S> = Arc<ApiExecutor<S>>;

fn acquisition_error(e: AuthError) -> ApiError {
    match e {
        AuthError::Http { message } => ApiError::Transport { message },
        other => ApiError::CredentialMissing {
            reason: other.to_string(),
        },
    }
}

fn refresh_error(e: AuthError) -> ApiError {
    match e {
        AuthError::Http { message } => ApiError::Transport { message },
        other => ApiError::ReauthRequired {
            reason: other.to_string(),
        },
    }
}

fn log_outcome<T>(operation: &str, result: &ApiResult<T>, retried: bool) {
    match result {
        Ok(_) => info!(operation, retried, "eBay call succeeded"),
        Err(e) => warn!(operation, retried, error = %e, "eBay call failed"),
    }
}
