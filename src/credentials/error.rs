use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Failed to read credentials from {path}: {message}")]
    #[diagnostic(
        code(ebay_mcp::credentials::read),
        help("Check that the env file exists, is readable and uses KEY=value lines.")
    )]
    Read { path: String, message: String },

    #[error("Failed to write credentials to {path}: {message}")]
    #[diagnostic(
        code(ebay_mcp::credentials::write),
        help("Check that the directory holding the env file is writable.")
    )]
    Write { path: String, message: String },

    #[error("Credential store lock poisoned")]
    #[diagnostic(code(ebay_mcp::credentials::poisoned))]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
