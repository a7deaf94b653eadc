//! Durable storage behind the session key.
//!
//! Two shipped backends: a JSON file under the client cache directory, and
//! the OS keychain. Both hold at most one key; saving overwrites whatever
//! was there. The manager logs storage failures and moves on - a broken
//! store never blocks a session transition.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Key file name in the cache directory
const KEY_FILE: &str = "apikey.json";

/// Keychain service name
const SERVICE_NAME: &str = "loft-client";

/// Keychain account under which the session key is filed
const KEY_ACCOUNT: &str = "apikey";

/// Durable home for the session key.
pub trait KeyStore: Send + Sync {
    /// Read the stored key, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Store `apikey`, replacing any previous value.
    fn save(&self, apikey: &str) -> Result<()>;

    /// Remove the stored key. A no-op when nothing is stored.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredKey {
    apikey: String,
    saved_at: DateTime<Utc>,
}

/// Key store backed by a JSON file in the client cache directory.
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the standard Loft cache directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Config::cache_dir()?))
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE)
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.key_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session key file")?;
        let stored: StoredKey = serde_json::from_str(&contents)
            .context("Failed to parse session key file")?;

        Ok(Some(stored.apikey))
    }

    fn save(&self, apikey: &str) -> Result<()> {
        let path = self.key_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredKey {
            apikey: apikey.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.key_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Key store backed by the OS keychain.
pub struct KeyringKeyStore;

impl KeyringKeyStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, KEY_ACCOUNT).context("Failed to create keyring entry")
    }
}

impl KeyStore for KeyringKeyStore {
    fn load(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(apikey) => Ok(Some(apikey)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read session key from keychain"),
        }
    }

    fn save(&self, apikey: &str) -> Result<()> {
        Self::entry()?
            .set_password(apikey)
            .context("Failed to store session key in keychain")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete session key from keychain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileKeyStore {
        FileKeyStore::new(dir.path().join("state"))
    }

    #[test]
    fn test_load_is_empty_before_any_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("K1").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("K1"));
    }

    #[test]
    fn test_save_overwrites_previous_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("K1").expect("save");
        store.save("K2").expect("save again");
        assert_eq!(store.load().expect("load").as_deref(), Some("K2"));
    }

    #[test]
    fn test_clear_removes_key_and_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("K1").expect("save");
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());

        // Clearing an already-empty store succeeds
        store.clear().expect("clear again");
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_stored_file_carries_timestamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("K1").expect("save");
        let contents = std::fs::read_to_string(store.key_path()).expect("read file");
        let stored: StoredKey = serde_json::from_str(&contents).expect("parse file");
        assert_eq!(stored.apikey, "K1");
        assert!(stored.saved_at <= Utc::now());
    }
}
