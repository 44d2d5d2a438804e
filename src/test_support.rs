//! Fixtures shared by the unit tests.

use std::sync::Arc;
use std::time::Duration;

use rmcp::model::{CallToolResult, RawContent};
use wiremock::MockServer;

use crate::auth::TokenManager;
use crate::config::{Endpoints, Settings};
use crate::credentials::{CredentialKey, CredentialStore, MemoryStore};
use crate::ebay::{ApiExecutor, EbayClient, build_http_client};

pub const TOKEN_PATH: &str = "/identity/v1/oauth2/token";

/// Store holding a signed-in seller with a refreshable token.
pub fn seller_store(access_token: &str) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        (CredentialKey::ClientId, "app-id"),
        (CredentialKey::ClientSecret, "app-secret"),
        (CredentialKey::UserAccessToken, access_token),
        (CredentialKey::UserRefreshToken, "refresh-1"),
    ]))
}

pub fn executor_for<S: CredentialStore>(server: &MockServer, store: Arc<S>) -> ApiExecutor<S> {
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let tokens = TokenManager::new(store, http.clone(), Endpoints::single(server.uri()));
    ApiExecutor::new(tokens, EbayClient::new(http, server.uri()))
}

/// Base URL of a local port that nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::for_base_url(server.uri());
    settings.offer_defaults.merchant_location_key = Some("warehouse-1".to_string());
    settings.offer_defaults.payment_policy_id = Some("pay-1".to_string());
    settings.offer_defaults.return_policy_id = Some("ret-1".to_string());
    settings.offer_defaults.fulfillment_policy_id = Some("ful-1".to_string());
    settings
}

/// Text of the first content block of a tool result.
pub fn tool_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    }
}

pub fn is_tool_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}
