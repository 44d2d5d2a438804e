//! HTTP client for the eBay REST APIs.
//!
//! Every request goes out with the same header set: bearer token, JSON
//! content type, and `en-GB` for both `Content-Language` and
//! `Accept-Language`. eBay rejects several locale variants on write paths,
//! so nothing else is negotiated and marketplace ids travel in the query or
//! body, never in a header.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_LANGUAGE, CONTENT_TYPE, HeaderMap,
    HeaderValue,
};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::debug;

use super::error::{ApiError, ApiResult};

pub const EBAY_LOCALE: &str = "en-GB";

/// Build the shared reqwest client with request and connect timeouts.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    // rustls is built without a default provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
}

/// Headers sent with every eBay REST call.
pub fn standard_headers(token: &str) -> ApiResult<HeaderMap> {
    let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ApiError::CredentialMissing {
            reason: "the stored access token contains characters that are not valid in a header"
                .to_string(),
        }
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_LANGUAGE, HeaderValue::from_static(EBAY_LOCALE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(EBAY_LOCALE));
    Ok(headers)
}

/// Resource path made of raw segments; each one is percent-encoded when
/// joined onto the base URL, so SKUs can carry any character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath(Vec<String>);

impl ApiPath {
    pub fn new(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Thin wrapper over reqwest bound to one API base URL.
#[derive(Clone)]
pub struct EbayClient {
    http: Client,
    base_url: Arc<str>,
}

impl EbayClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &ApiPath) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ApiError::InvalidResponse {
            message: format!("invalid API base URL {}: {e}", self.base_url),
        })?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidResponse {
                message: format!("API base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(&path.0);
        Ok(url)
    }

    fn request(&self, method: Method, token: &str, path: &ApiPath) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, path = %path, "eBay request");
        Ok(self
            .http
            .request(method, url)
            .headers(standard_headers(token)?))
    }

    pub async fn get_json(
        &self,
        token: &str,
        path: &ApiPath,
        query: &[(&str, String)],
    ) -> ApiResult<Value> {
        let builder = self.request(Method::GET, token, path)?.query(query);
        Self::handle_response(builder.send().await?).await
    }

    pub async fn post_json(&self, token: &str, path: &ApiPath, body: &Value) -> ApiResult<Value> {
        let builder = self
            .request(Method::POST, token, path)?
            .body(serde_json::to_vec(body)?);
        Self::handle_response(builder.send().await?).await
    }

    /// Full-document replacement. The body is sent as pre-serialised bytes
    /// so the headers above are the only ones on the request.
    pub async fn put_json(&self, token: &str, path: &ApiPath, body: &Value) -> ApiResult<Value> {
        let builder = self
            .request(Method::PUT, token, path)?
            .body(serde_json::to_vec(body)?);
        Self::handle_response(builder.send().await?).await
    }

    pub async fn delete(&self, token: &str, path: &ApiPath) -> ApiResult<Value> {
        let builder = self.request(Method::DELETE, token, path)?;
        Self::handle_response(builder.send().await?).await
    }

    /// Map a response to its JSON body, or to `ApiError::Upstream` with the
    /// status and body verbatim. Empty success bodies become `null`.
    pub async fn handle_response(response: Response) -> ApiResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse {
            message: format!("HTTP {} body is not JSON: {e}", status.as_u16()),
        })
    }
}

