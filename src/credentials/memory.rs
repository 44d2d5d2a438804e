use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialKey, CredentialStore, StoreError, StoreResult};

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<CredentialKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CredentialKey, V)>,
        V: Into<String>,
    {
        let values = entries.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: CredentialKey) -> StoreResult<Option<String>> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(&key).filter(|v| !v.is_empty()).cloned())
    }

    fn set_many(&self, entries: &[(CredentialKey, String)]) -> StoreResult<()> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        for (key, value) in entries {
            values.insert(*key, value.clone());
        }
        Ok(())
    }
}
