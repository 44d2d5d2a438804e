use miette::Diagnostic;
use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::credentials::StoreError;
use crate::ebay::ApiError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to listen on {addr}: {message}")]
    #[diagnostic(
        code(ebay_mcp::cli::bind_failed),
        help("Pick another --host/--port, or stop the process using it.")
    )]
    BindFailed { addr: String, message: String },

    #[error("MCP server stopped with an error: {message}")]
    #[diagnostic(code(ebay_mcp::cli::server))]
    Server { message: String },

    #[error("Invalid output format '{format}'")]
    #[diagnostic(code(ebay_mcp::cli::format), help("Use 'table' or 'json'."))]
    InvalidFormat { format: String },

    #[error("Failed to render JSON: {message}")]
    #[diagnostic(code(ebay_mcp::cli::json))]
    Json { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
