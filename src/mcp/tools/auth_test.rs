//! Tests for the authentication MCP tools

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::credentials::{CredentialKey, MemoryStore};
use crate::mcp::tools::AuthTools;
use crate::test_support::{
    TOKEN_PATH, executor_for, is_tool_error, seller_store, settings_for, tool_text,
};

fn auth_tools(server: &MockServer, store: Arc<MemoryStore>) -> AuthTools<MemoryStore> {
    let mut settings = settings_for(server);
    settings.callback_port = 0;
    AuthTools::new(Arc::new(executor_for(server, store)), Arc::new(settings))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_reports_user_token() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::with_entries([
        (CredentialKey::UserAccessToken, "v^1.1#i^1#abcdefghijklmnop"),
        (CredentialKey::UserName, "brass_and_bits"),
    ]));

    let result = auth_tools(&server, store).test_auth().await.unwrap();

    assert!(!is_tool_error(&result));
    let body: Value = serde_json::from_str(tool_text(&result)).unwrap();
    assert_eq!(body["token_source"], "user");
    assert_eq!(body["token_prefix"], "v^1.1#i^1#");
    assert_eq!(body["token_length"], 26);
    assert_eq!(body["user_name"], "brass_and_bits");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_reports_application_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "app-token-123"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let store = Arc::new(MemoryStore::with_entries([
        (CredentialKey::ClientId, "app-id"),
        (CredentialKey::ClientSecret, "app-secret"),
    ]));

    let result = auth_tools(&server, store).test_auth().await.unwrap();

    let body: Value = serde_json::from_str(tool_text(&result)).unwrap();
    assert_eq!(body["token_source"], "application");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("trigger_ebay_login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_without_credentials() {
    let server = MockServer::start().await;

    let result = auth_tools(&server, Arc::new(MemoryStore::new()))
        .test_auth()
        .await
        .unwrap();

    assert!(is_tool_error(&result));
    assert!(tool_text(&result).contains("trigger_ebay_login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_needs_redirect_uri() {
    let server = MockServer::start().await;

    let result = auth_tools(&server, seller_store("token"))
        .trigger_ebay_login()
        .await
        .unwrap();

    assert!(is_tool_error(&result));
    assert!(tool_text(&result).contains("EBAY_REDIRECT_URI"));
}
