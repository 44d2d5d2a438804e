//! Credential storage.
//!
//! OAuth tokens and client credentials live behind the [`CredentialStore`]
//! trait so the token manager never touches process-wide state. The
//! env-file store is what the binary uses; the in-memory store backs tests
//! and embedders that keep secrets elsewhere.
//!
//! Stores do not serialise writers. Two concurrent refreshes both write and
//! the later one wins.

mod env_file;
mod error;
mod memory;


pub use env_file::EnvFileStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

#[cfg(test)]
use mockall::automock;

/// Keys held in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    ClientId,
    ClientSecret,
    UserAccessToken,
    UserRefreshToken,
    UserId,
    UserName,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 6] = [
        CredentialKey::ClientId,
        CredentialKey::ClientSecret,
        CredentialKey::UserAccessToken,
        CredentialKey::UserRefreshToken,
        CredentialKey::UserId,
        CredentialKey::UserName,
    ];

    /// Variable name used in the env file.
    pub fn env_name(self) -> &'static str {
        match self {
            CredentialKey::ClientId => "EBAY_CLIENT_ID",
            CredentialKey::ClientSecret => "EBAY_CLIENT_SECRET",
            CredentialKey::UserAccessToken => "EBAY_USER_ACCESS_TOKEN",
            CredentialKey::UserRefreshToken => "EBAY_USER_REFRESH_TOKEN",
            CredentialKey::UserId => "EBAY_USER_ID",
            CredentialKey::UserName => "EBAY_USER_NAME",
        }
    }

    pub fn from_env_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.env_name() == name)
    }
}

/// Point-in-time copy of every stored credential.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_access_token: Option<String>,
    pub user_refresh_token: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl Credentials {
    /// Client id and secret, when both are configured.
    pub fn client_pair(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

/// Key-value store for OAuth credentials.
#[cfg_attr(test, automock)]
pub trait CredentialStore: Send + Sync {
    /// Read a single credential. Missing and empty values are `None`.
    fn get(&self, key: CredentialKey) -> StoreResult<Option<String>>;

    /// Overwrite several credentials in one write.
    fn set_many(&self, entries: &[(CredentialKey, String)]) -> StoreResult<()>;

    /// Read every credential.
    fn snapshot(&self) -> StoreResult<Credentials> {
        Ok(Credentials {
            client_id: self.get(CredentialKey::ClientId)?,
            client_secret: self.get(CredentialKey::ClientSecret)?,
            user_access_token: self.get(CredentialKey::UserAccessToken)?,
            user_refresh_token: self.get(CredentialKey::UserRefreshToken)?,
            user_id: self.get(CredentialKey::UserId)?,
            user_name: self.get(CredentialKey::UserName)?,
        })
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    fn get(&self, key: CredentialKey) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set_many(&self, entries: &[(CredentialKey, String)]) -> StoreResult<()> {
        (**self).set_many(entries)
    }

    fn snapshot(&self) -> StoreResult<Credentials> {
        (**self).snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_names_round_trip() {
        for key in CredentialKey::ALL {
            assert_eq!(CredentialKey::from_env_name(key.env_name()), Some(key));
        }
        assert_eq!(CredentialKey::from_env_name("EBAY_MARKETPLACE_ID"), None);
    }

    #[test]
    fn test_client_pair_requires_both() {
        let mut creds = Credentials {
            client_id: Some("id".to_string()),
            ..Default::default()
        };
        assert!(creds.client_pair().is_none());

        creds.client_secret = Some("secret".to_string());
        assert_eq!(creds.client_pair(), Some(("id", "secret")));
    }

    #[test]
    fn test_snapshot_collects_all_keys() {
        let store = MemoryStore::with_entries([
            (CredentialKey::ClientId, "id"),
            (CredentialKey::UserName, "seller"),
        ]);
        let creds = store.snapshot().unwrap();

        assert_eq!(creds.client_id.as_deref(), Some("id"));
        assert_eq!(creds.user_name.as_deref(), Some("seller"));
        assert!(creds.user_access_token.is_none());
    }
}
