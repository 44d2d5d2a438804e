use miette::Diagnostic;
use thiserror::Error;

use crate::credentials::StoreError;

/// Failures while obtaining, refreshing or granting eBay tokens.
#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error(
        "No eBay user access token is stored and EBAY_CLIENT_ID/EBAY_CLIENT_SECRET are not configured"
    )]
    #[diagnostic(
        code(ebay_mcp::auth::no_credentials),
        help("Run `ebay-mcp login` or call the trigger_ebay_login tool.")
    )]
    NoCredentials,

    #[error("EBAY_CLIENT_ID and EBAY_CLIENT_SECRET are required for {operation}")]
    #[diagnostic(
        code(ebay_mcp::auth::missing_client_credentials),
        help("Add the keyset from the eBay developer portal to the env file.")
    )]
    MissingClientCredentials { operation: &'static str },

    #[error("No refresh token is stored")]
    #[diagnostic(
        code(ebay_mcp::auth::no_refresh_token),
        help("Run `ebay-mcp login` or call the trigger_ebay_login tool.")
    )]
    NoRefreshToken,

    #[error("eBay refused the refresh token ({status}): {body}")]
    #[diagnostic(
        code(ebay_mcp::auth::refresh_denied),
        help("The refresh token is expired or revoked. Sign in again.")
    )]
    RefreshDenied { status: u16, body: String },

    #[error("eBay refused the {grant} grant ({status}): {body}")]
    #[diagnostic(code(ebay_mcp::auth::grant_denied))]
    GrantDenied {
        grant: &'static str,
        status: u16,
        body: String,
    },

    #[error("eBay identity lookup failed ({status}): {body}")]
    #[diagnostic(code(ebay_mcp::auth::identity))]
    Identity { status: u16, body: String },

    #[error("Request to the eBay token service failed: {message}")]
    #[diagnostic(
        code(ebay_mcp::auth::http),
        help("Check network connectivity to api.ebay.com.")
    )]
    Http { message: String },

    #[error("Unexpected response from eBay: {message}")]
    #[diagnostic(code(ebay_mcp::auth::invalid_response))]
    InvalidResponse { message: String },

    #[error("EBAY_REDIRECT_URI (the eBay RuName) is not configured")]
    #[diagnostic(
        code(ebay_mcp::auth::missing_redirect_uri),
        help("Copy the RuName from the eBay developer portal into the env file.")
    )]
    MissingRedirectUri,

    #[error("Could not listen for the OAuth callback on port {port}: {message}")]
    #[diagnostic(
        code(ebay_mcp::auth::callback_bind),
        help("Free the port or set EBAY_OAUTH_CALLBACK_PORT.")
    )]
    CallbackBind { port: u16, message: String },

    #[error("No OAuth callback arrived within {seconds}s")]
    #[diagnostic(code(ebay_mcp::auth::login_timeout))]
    LoginTimeout { seconds: u64 },

    #[error("eBay sign-in was declined: {error} {description}")]
    #[diagnostic(code(ebay_mcp::auth::login_declined))]
    LoginDeclined { error: String, description: String },

    #[error("OAuth callback state did not match the login request")]
    #[diagnostic(
        code(ebay_mcp::auth::state_mismatch),
        help("Start the login again and use the newest consent link.")
    )]
    StateMismatch,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            AuthError::Http {
                message: e.to_string(),
            }
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
