//! Durable storage for the session token.
//!
//! A `TokenStore` holds exactly one opaque token under a fixed key. It does
//! not look inside the token. Every `set`/`clear` is visible to the next
//! `get`, including from a fresh process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keychain service name
const SERVICE_NAME: &str = "moodiary";

/// Fixed key the session token lives under
pub const SESSION_TOKEN_KEY: &str = "session-token";

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable home of the session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` when nothing is stored
    fn get(&self) -> Result<Option<String>, CredentialError>;

    /// Persist `token`, replacing any previous one
    fn set(&self, token: &str) -> Result<(), CredentialError>;

    /// Remove the persisted token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CredentialError>;
}

// ============================================================================
// File-backed store
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as `session.json` in the application data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&contents)?;
        Ok(Some(stored.token))
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        // Readers must never observe a partial write
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&stored)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// OS keychain store
// ============================================================================

/// Token persisted in the OS keychain.
pub struct KeyringTokenStore {
    entry: Entry,
}

impl KeyringTokenStore {
    pub fn new() -> Result<Self, CredentialError> {
        Ok(Self {
            entry: Entry::new(SERVICE_NAME, SESSION_TOKEN_KEY)?,
        })
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        self.entry.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store. Clones share the same slot, so a clone outlives a
/// dropped `Session` the way a file outlives a process.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.slot().clone())
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.get().expect("get"), None);
        store.set("tok123").expect("set");
        assert_eq!(store.get().expect("get").as_deref(), Some("tok123"));

        // A second handle on the same directory sees the same token
        let reopened = FileTokenStore::new(dir.path());
        assert_eq!(reopened.get().expect("get").as_deref(), Some("tok123"));

        store.set("tok456").expect("set");
        assert_eq!(reopened.get().expect("get").as_deref(), Some("tok456"));
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path());

        store.clear().expect("clearing an empty store");
        store.set("tok").expect("set");
        store.clear().expect("clear");
        store.clear().expect("clear again");
        assert_eq!(store.get().expect("get"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested").join("data"));
        store.set("tok").expect("set");
        assert_eq!(store.get().expect("get").as_deref(), Some("tok"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path());
        fs::write(store.path(), "not json").expect("write");
        assert!(matches!(store.get(), Err(CredentialError::Corrupt(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path());
        store.set("tok").expect("set");
        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        store.set("tok").expect("set");
        assert_eq!(other.get().expect("get").as_deref(), Some("tok"));
        other.clear().expect("clear");
        assert_eq!(store.get().expect("get"), None);
    }
}
