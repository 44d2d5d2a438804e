//! Tests for the sign-in flow

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::login::*;
use crate::auth::{AuthError, TokenManager};
use crate::config::{Endpoints, Settings};
use crate::credentials::{CredentialKey, CredentialStore, MemoryStore};
use crate::ebay::client::build_http_client;

#[tokio::test(flavor = "multi_thread")]
async fn test_callback_router_forwards_code() {
    let (tx, rx) = oneshot::channel();
    let app = callback_router(tx);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oauth/callback?code=v%5E1.1%23code&state=abc&expires_in=299")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("sign-in complete"));

    let params = rx.await.unwrap();
    assert_eq!(params.code.as_deref(), Some("v^1.1#code"));
    assert_eq!(params.state.as_deref(), Some("abc"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_callback_router_reports_decline() {
    let (tx, rx) = oneshot::channel();
    let response = callback_router(tx)
        .oneshot(
            Request::builder()
                .uri("/oauth/callback?error=access_denied&error_description=user%20cancelled")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let params = rx.await.unwrap();
    let err = validate_callback(params, "state").unwrap_err();
    match err {
        AuthError::LoginDeclined { error, description } => {
            assert_eq!(error, "access_denied");
            assert_eq!(description, "user cancelled");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validate_callback_checks_state() {
    let params = CallbackParams {
        code: Some("code".to_string()),
        state: Some("other".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        validate_callback(params, "expected"),
        Err(AuthError::StateMismatch)
    ));

    let params = CallbackParams {
        code: Some("code".to_string()),
        state: Some("expected".to_string()),
        ..Default::default()
    };
    assert_eq!(validate_callback(params, "expected").unwrap(), "code");
}

#[test]
fn test_validate_callback_requires_code() {
    let params = CallbackParams {
        state: Some("s".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        validate_callback(params, "s"),
        Err(AuthError::InvalidResponse { .. })
    ));
}

#[test]
fn test_authorization_url() {
    let url = authorization_url(&Endpoints::default(), "app-id", "My_RuName", "xyz").unwrap();

    assert_eq!(url.host_str(), Some("auth.ebay.com"));
    assert_eq!(url.path(), "/oauth2/authorize");
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("client_id".to_string(), "app-id".to_string())));
    assert!(pairs.contains(&("redirect_uri".to_string(), "My_RuName".to_string())));
    assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
    assert!(pairs.contains(&("state".to_string(), "xyz".to_string())));
    let scope = pairs.iter().find(|(k, _)| k == "scope").unwrap();
    assert!(scope.1.contains("sell.inventory"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_requires_redirect_uri() {
    let store = Arc::new(MemoryStore::with_entries([
        (CredentialKey::ClientId, "app-id"),
        (CredentialKey::ClientSecret, "app-secret"),
    ]));
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let tokens = TokenManager::new(store, http, Endpoints::default());
    let settings = Settings::default();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let err = LoginFlow::new(&tokens, &settings)
        .without_browser()
        .run_with_listener(listener, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingRedirectUri));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_times_out_without_callback() {
    let store = Arc::new(MemoryStore::with_entries([
        (CredentialKey::ClientId, "app-id"),
        (CredentialKey::ClientSecret, "app-secret"),
    ]));
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let tokens = TokenManager::new(store, http, Endpoints::default());
    let settings = Settings {
        redirect_uri: Some("My_RuName".to_string()),
        login_timeout: Duration::from_millis(100),
        ..Settings::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let err = LoginFlow::new(&tokens, &settings)
        .without_browser()
        .run_with_listener(listener, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::LoginTimeout { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_login_round_trip() {
    let ebay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v1/oauth2/token"))
        .and(body_string_contains("code=granted-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "refresh_token": "user-refresh"
        })))
        .expect(1)
        .mount(&ebay)
        .await;
    Mock::given(method("GET"))
        .and(path("/commerce/identity/v1/user/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"userId": "u-9", "username": "shop"})),
        )
        .mount(&ebay)
        .await;

    let store = Arc::new(MemoryStore::with_entries([
        (CredentialKey::ClientId, "app-id"),
        (CredentialKey::ClientSecret, "app-secret"),
    ]));
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let tokens = TokenManager::new(
        Arc::clone(&store),
        http.clone(),
        Endpoints::single(ebay.uri()),
    );
    let settings = Settings {
        redirect_uri: Some("My_RuName".to_string()),
        login_timeout: Duration::from_secs(10),
        ..Settings::for_base_url(ebay.uri())
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let callback_addr = listener.local_addr().unwrap();

    // Plays the browser: follows the consent URL's state back to the listener
    let (url_tx, url_rx) = oneshot::channel::<String>();
    let browser = tokio::spawn(async move {
        let consent = reqwest::Url::parse(&url_rx.await.unwrap()).unwrap();
        let state = consent
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        http.get(format!("http://{callback_addr}/oauth/callback?code=granted-code&state={state}"))
            .send()
            .await
            .unwrap()
            .status()
    });

    let outcome = LoginFlow::new(&tokens, &settings)
        .without_browser()
        .run_with_listener(listener, move |url| {
            let _ = url_tx.send(url.to_string());
        })
        .await
        .unwrap();

    assert_eq!(browser.await.unwrap(), reqwest::StatusCode::OK);
    assert_eq!(outcome.identity.unwrap().user_id, "u-9");
    let creds = store.snapshot().unwrap();
    assert_eq!(creds.user_access_token.as_deref(), Some("user-token"));
    assert_eq!(creds.user_refresh_token.as_deref(), Some("user-refresh"));
    assert_eq!(creds.user_name.as_deref(), Some("shop"));
}
