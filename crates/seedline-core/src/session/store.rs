//! Credential persistence contract.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use strum::{AsRefStr, EnumIter};

/// Fixed keys of the persisted session storage.
///
/// No key implies the presence of another; readers treat a missing key as
/// "logged out" for that piece of data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter,
)]
pub enum StorageKey {
    /// Bearer credential.
    #[serde(rename = "token")]
    #[strum(serialize = "token")]
    Token,
    /// Submitted login form serialized as JSON text.
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    User,
    /// Plain username.
    #[serde(rename = "username")]
    #[strum(serialize = "username")]
    Username,
    /// Cached profile object serialized as JSON text.
    #[serde(rename = "infoUser")]
    #[strum(serialize = "infoUser")]
    InfoUser,
}

/// Process-wide key-value storage holding the session.
///
/// Implementations must be cheap to read: the session context reads once at
/// startup and then serves reads from memory, but writes go straight through.
pub trait CredentialStore: Send + Sync {
    /// Reads a value, `None` when the key was never written or was removed.
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Removes a single key. Removing an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<()>;

    /// Removes every key.
    fn clear(&self) -> Result<()>;
}

/// Volatile store used by tests and by front ends that do not persist sessions.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a credential.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.write() {
            values.insert(StorageKey::Token, token.into());
        }
        store
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| crate::SeedlineError::storage(format!("lock poisoned: {}", e)))?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| crate::SeedlineError::storage(format!("lock poisoned: {}", e)))?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| crate::SeedlineError::storage(format!("lock poisoned: {}", e)))?;
        values.remove(&key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| crate::SeedlineError::storage(format!("lock poisoned: {}", e)))?;
        values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_names() {
        assert_eq!(StorageKey::Token.as_ref(), "token");
        assert_eq!(StorageKey::User.as_ref(), "user");
        assert_eq!(StorageKey::Username.as_ref(), "username");
        assert_eq!(StorageKey::InfoUser.as_ref(), "infoUser");
    }

    #[test]
    fn test_in_memory_store_lifecycle() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);

        store.set(StorageKey::Token, "abc").unwrap();
        store.set(StorageKey::Username, "alice").unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap().as_deref(), Some("abc"));

        store.remove(StorageKey::Token).unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        // Other keys survive a single removal
        assert_eq!(
            store.get(StorageKey::Username).unwrap().as_deref(),
            Some("alice")
        );

        store.clear().unwrap();
        assert_eq!(store.get(StorageKey::Username).unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = InMemoryCredentialStore::new();
        assert!(store.remove(StorageKey::InfoUser).is_ok());
    }
}
