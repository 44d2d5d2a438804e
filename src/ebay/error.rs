use miette::Diagnostic;
use thiserror::Error;

/// Name of the tool that starts an interactive eBay sign-in.
pub const LOGIN_TOOL: &str = "trigger_ebay_login";

/// Outcome of a failed eBay operation.
///
/// Display text is read by an LLM caller, so every variant that needs
/// follow-up names the next step.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(
        "No usable eBay credentials ({reason}). Call the `trigger_ebay_login` tool to sign in to eBay, then retry this request."
    )]
    #[diagnostic(code(ebay_mcp::api::credential_missing))]
    CredentialMissing { reason: String },

    #[error(
        "eBay rejected the access token and it could not be renewed ({reason}). Call the `trigger_ebay_login` tool to sign in again, then retry this request."
    )]
    #[diagnostic(code(ebay_mcp::api::reauth_required))]
    ReauthRequired { reason: String },

    #[error("eBay API returned HTTP {status}: {body}")]
    #[diagnostic(code(ebay_mcp::api::upstream))]
    Upstream { status: u16, body: String },

    #[error("Invalid input: {message}. Nothing was sent to eBay; correct the parameters and retry.")]
    #[diagnostic(code(ebay_mcp::api::validation))]
    Validation { message: String },

    #[error("{message}")]
    #[diagnostic(code(ebay_mcp::api::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(code(ebay_mcp::api::not_found))]
    NotFound { message: String },

    #[error("Could not reach eBay: {message}. Retry the request later.")]
    #[diagnostic(code(ebay_mcp::api::transport))]
    Transport { message: String },

    #[error("Unexpected response from eBay: {message}")]
    #[diagnostic(code(ebay_mcp::api::invalid_response))]
    InvalidResponse { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Upstream { status: 401, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Upstream { status: 404, .. })
    }

    /// Whether recovering from this error needs an interactive sign-in.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            ApiError::CredentialMissing { .. } | ApiError::ReauthRequired { .. }
        )
    }

    /// Caller-facing message prefixed with the failed operation.
    pub fn describe(&self, operation: &str) -> String {
        format!("{operation} failed: {self}")
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::InvalidResponse {
                message: e.to_string(),
            }
        } else if e.is_timeout() {
            ApiError::Transport {
                message: format!("request timed out ({e})"),
            }
        } else {
            ApiError::Transport {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
