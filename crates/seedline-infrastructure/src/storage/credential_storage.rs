//! File-backed credential store.
//!
//! Persists the session keys (`token`, `user`, `username`, `infoUser`) as a flat
//! JSON object in `~/.config/seedline/session.json`.

use super::atomic_file::{AtomicFile, FileFormat};
use crate::paths::SeedlinePaths;
use seedline_core::session::{CredentialStore, StorageKey};
use seedline_core::{Result, SeedlineError};
use std::collections::BTreeMap;
use std::path::PathBuf;

type KeyValues = BTreeMap<String, String>;

/// Storage for the session file.
///
/// Responsibilities:
/// - Read/write individual keys of session.json
/// - Keep the file at mode 600 on Unix
///
/// Does NOT:
/// - Validate credentials
/// - Cache values (the session context keeps the in-memory copy)
pub struct FileCredentialStore {
    file: AtomicFile<KeyValues>,
}

impl FileCredentialStore {
    /// Creates a store at the default location.
    pub fn new() -> Result<Self> {
        let path = SeedlinePaths::new(None)
            .session_file()
            .map_err(|e| SeedlineError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path, FileFormat::Json).with_mode(0o600),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    fn read_all(&self) -> Result<KeyValues> {
        match self.file.load() {
            Ok(values) => Ok(values.unwrap_or_default()),
            Err(e) => {
                // A corrupt session file reads as logged out rather than failing every call.
                tracing::warn!("[CredentialStore] Ignoring unreadable session file: {}", e);
                Ok(KeyValues::new())
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key.as_ref()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        if self.file.load().is_err() {
            self.file.delete()?;
        }
        self.file
            .update(KeyValues::new(), |values| {
                values.insert(key.as_ref().to_string(), value.to_string());
            })
            .map_err(Into::into)
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        if self.file.load().ok().flatten().is_none() {
            return Ok(());
        }
        self.file
            .update(KeyValues::new(), |values| {
                values.remove(key.as_ref());
            })
            .map_err(Into::into)
    }

    fn clear(&self) -> Result<()> {
        tracing::debug!("[CredentialStore] Clearing {}", self.file.path().display());
        self.file.delete().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(temp_dir.path().join("session.json"));
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileCredentialStore::with_path(path.clone());

        store.set(StorageKey::Token, "YWxpY2U6c2VjcmV0").unwrap();
        store.set(StorageKey::Username, "alice").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"token\""));
        assert!(raw.contains("\"username\""));

        store.remove(StorageKey::Token).unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        assert_eq!(
            store.get(StorageKey::Username).unwrap().as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileCredentialStore::with_path(path.clone());
        store.set(StorageKey::InfoUser, r#"{"id":1}"#).unwrap();

        store.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileCredentialStore::with_path(path);
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    }
}
