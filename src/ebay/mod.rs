//! eBay REST access: HTTP client, error taxonomy and the token-injecting
//! executor every tool goes through.

mod catalog;
pub mod client;
pub mod error;
pub mod executor;
pub mod inventory;


pub use client::{ApiPath, EbayClient, build_http_client, standard_headers};
pub use error::{ApiError, ApiResult, LOGIN_TOOL};
pub use executor::{ApiExecutor, SharedExecutor};
