//! MCP tools for eBay authentication.

use std::sync::Arc;

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use tracing::info;

use crate::auth::{AccessToken, LoginFlow, TokenSource};
use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::{ApiError, SharedExecutor};
use crate::mcp::tools::{error_result, json_result};

#[derive(Debug, Serialize)]
pub struct TestAuthReport {
    pub success: bool,
    pub token_source: TokenSource,
    pub token_prefix: String,
    pub token_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub message: String,
}

impl TestAuthReport {
    fn new(token: &AccessToken, user_name: Option<String>) -> Self {
        let message = match token.source {
            TokenSource::User => "Using the stored seller token.".to_string(),
            TokenSource::Application => format!(
                "Using an application token. Browse and taxonomy tools work; seller tools need `{}`.",
                crate::ebay::LOGIN_TOOL
            ),
        };
        Self {
            success: true,
            token_source: token.source,
            token_prefix: token.value.chars().take(10).collect(),
            token_length: token.value.len(),
            user_name,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub message: String,
}

pub struct AuthTools<S> {
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
}

impl<S> Clone for AuthTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: CredentialStore + 'static> AuthTools<S> {
    pub fn new(executor: SharedExecutor<S>, settings: Arc<Settings>) -> Self {
        Self { executor, settings }
    }

    pub async fn test_auth(&self) -> Result<CallToolResult, McpError> {
        let tokens = self.executor.tokens();
        let token = match tokens.access_token().await {
            Ok(token) => token,
            Err(e) => {
                let err = ApiError::CredentialMissing {
                    reason: e.to_string(),
                };
                return Ok(error_result("test_auth", &err));
            }
        };
        info!(source = ?token.source, token = %token.redacted(), "Token check passed");

        let user_name = tokens.credentials().ok().and_then(|c| c.user_name);
        json_result(&TestAuthReport::new(&token, user_name))
    }

    pub async fn trigger_ebay_login(&self) -> Result<CallToolResult, McpError> {
        let flow = LoginFlow::new(self.executor.tokens(), &self.settings);
        let outcome = flow
            .run(|url| info!(%url, "Consent page opened for eBay sign-in"))
            .await;

        match outcome {
            Ok(outcome) => {
                let (user_id, username) = match outcome.identity {
                    Some(identity) => (Some(identity.user_id), identity.username),
                    None => (None, None),
                };
                let who = username.as_deref().unwrap_or("the seller account");
                json_result(&LoginReport {
                    success: true,
                    message: format!(
                        "Signed in to eBay as {who}. The new tokens are stored and used from the next call; no restart is needed."
                    ),
                    user_id,
                    username,
                })
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "trigger_ebay_login failed: {e}"
            ))])),
        }
    }
}
