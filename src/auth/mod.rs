//! OAuth token management and seller sign-in.

mod error;
pub mod login;
mod token;

#[cfg(test)]
mod login_test;

pub use error::{AuthError, AuthResult};
pub use login::{LoginFlow, LoginOutcome};
pub use token::{
    APPLICATION_SCOPE, AccessToken, TokenManager, TokenResponse, TokenSource, USER_SCOPES,
    UserIdentity, redact,
};
