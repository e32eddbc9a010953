//! Namespaced key-value storage for the desk
//!
//! Every store in the crate (chats, reminders, settings, the current user)
//! reads and writes JSON text under a well-known key through [`Storage`].
//! The backend is injected through the [`KeyValueStore`] trait so the
//! embedded database can be swapped for [`MemoryStore`] in tests.
//!
//! Each successful mutation is published on a broadcast channel; observers
//! such as the reminder badge subscribe instead of polling.

use crate::config::StorageConfig;
use crate::error::{DeskError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

pub mod memory;
pub mod sled_store;
pub mod types;

pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use types::{ChangeKind, StorageChange};

/// Key holding the app settings blob
pub const APP_SETTINGS_KEY: &str = "appSettings";

/// Key holding the logged-in user identifier
pub const CURRENT_USER_KEY: &str = "currentUser";

const CHAT_HISTORY_PREFIX: &str = "chatHistory_";
const REMINDERS_PREFIX: &str = "userReminders_";
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Key for a user's chat history
///
/// # Examples
///
/// ```
/// use consultdesk::storage::chat_history_key;
///
/// assert_eq!(chat_history_key("ana"), "chatHistory_ana");
/// ```
pub fn chat_history_key(user: &str) -> String {
    format!("{}{}", CHAT_HISTORY_PREFIX, user)
}

/// Key for a user's reminders
pub fn reminders_key(user: &str) -> String {
    format!("{}{}", REMINDERS_PREFIX, user)
}

/// Minimal key-value capability every backend provides
///
/// Values are opaque strings; callers own the encoding.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning whether it was present
    fn delete(&self, key: &str) -> Result<bool>;

    /// List keys starting with `prefix`, in ascending order
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys(prefix)
    }
}

/// Shared handle to the desk's storage backend
///
/// Cloning is cheap; all clones share the backend and the change channel.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<StorageChange>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}

impl Storage {
    /// Wrap an arbitrary backend
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            backend: Arc::new(backend),
            changes,
        }
    }

    /// Storage backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open the on-disk store described by `config`
    ///
    /// Uses `config.path` when set, otherwise a `store` directory inside the
    /// user's data directory.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Storage` if the data directory cannot be resolved
    /// or the database cannot be opened
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let path = match &config.path {
            Some(path) => PathBuf::from(path),
            None => default_store_path()?,
        };
        tracing::info!("Opening desk store at {}", path.display());
        Ok(Self::new(SledStore::open(path)?))
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    /// Read the raw value under `key`
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key)
    }

    /// Write a raw value under `key` and notify subscribers
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.backend.set(key, value)?;
        // No subscribers is not an error.
        let _ = self.changes.send(StorageChange::set(key));
        Ok(())
    }

    /// Remove `key`, notifying subscribers when something was removed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.backend.delete(key)?;
        if removed {
            let _ = self.changes.send(StorageChange::removed(key));
        }
        Ok(removed)
    }

    /// List keys under `prefix`
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.backend.keys(prefix)
    }

    /// Users that have chat history or reminders stored
    pub fn known_users(&self) -> Result<Vec<String>> {
        let mut users: Vec<String> = self
            .keys(CHAT_HISTORY_PREFIX)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(CHAT_HISTORY_PREFIX).map(str::to_string))
            .chain(
                self.keys(REMINDERS_PREFIX)?
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(REMINDERS_PREFIX).map(str::to_string)),
            )
            .collect();
        users.sort();
        users.dedup();
        Ok(users)
    }

    /// Read a JSON value, treating malformed content as absent
    ///
    /// Backend failures are still returned as errors.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring malformed JSON under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Read a JSON array, treating missing or malformed content as empty
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.load_json(key)?.unwrap_or_default())
    }

    /// Serialize `value` as JSON and write it under `key`
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| DeskError::Storage(format!("Serialization failed: {}", e)))?;
        self.set_raw(key, &json)
    }
}

fn default_store_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "consultdesk", "consultdesk")
        .ok_or_else(|| DeskError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("store"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_key_helpers_namespace_by_user() {
        assert_eq!(chat_history_key("ana"), "chatHistory_ana");
        assert_eq!(reminders_key("ana"), "userReminders_ana");
    }

    #[test]
    fn test_load_list_missing_key_is_empty() {
        let storage = Storage::in_memory();
        let items: Vec<Item> = storage.load_list("missing").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_sled_backed_save_and_load_json() {
        let (storage, _dir) = crate::test_utils::temp_sled_storage();
        let items = vec![Item {
            name: "ana".to_string(),
        }];
        storage.save_json("items", &items).unwrap();

        let loaded: Vec<Item> = storage.load_list("items").unwrap();
        assert_eq!(loaded, items);
        assert!(storage.remove("items").unwrap());
        assert!(storage.load_list::<Item>("items").unwrap().is_empty());
    }

    #[test]
    fn test_load_list_malformed_json_is_empty() {
        let storage = Storage::in_memory();
        storage.set_raw("broken", "[{not json").unwrap();
        let items: Vec<Item> = storage.load_list("broken").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_load_list_wrong_shape_is_empty() {
        let storage = Storage::in_memory();
        storage.set_raw("shape", r#"{"name":"not a list"}"#).unwrap();
        let items: Vec<Item> = storage.load_list("shape").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_save_then_load_list() {
        let storage = Storage::in_memory();
        let items = vec![
            Item {
                name: "a".to_string(),
            },
            Item {
                name: "b".to_string(),
            },
        ];
        storage.save_json("items", &items).unwrap();
        let loaded: Vec<Item> = storage.load_list("items").unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_mutations_are_broadcast() {
        let storage = Storage::in_memory();
        let mut rx = storage.subscribe();

        storage.set_raw("k", "1").unwrap();
        storage.remove("k").unwrap();
        // Removing a missing key publishes nothing.
        storage.remove("k").unwrap();

        assert_eq!(rx.try_recv().unwrap(), StorageChange::set("k"));
        assert_eq!(rx.try_recv().unwrap(), StorageChange::removed("k"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_backend() {
        let storage = Storage::in_memory();
        let clone = storage.clone();
        clone.set_raw(CURRENT_USER_KEY, "ana").unwrap();
        assert_eq!(
            storage.get_raw(CURRENT_USER_KEY).unwrap().as_deref(),
            Some("ana")
        );
    }

    #[test]
    fn test_known_users_merges_namespaces() {
        let storage = Storage::in_memory();
        storage.set_raw(&chat_history_key("ben"), "[]").unwrap();
        storage.set_raw(&reminders_key("ana"), "[]").unwrap();
        storage.set_raw(&reminders_key("ben"), "[]").unwrap();
        storage.set_raw(APP_SETTINGS_KEY, "{}").unwrap();

        assert_eq!(storage.known_users().unwrap(), vec!["ana", "ben"]);
    }

    #[test]
    fn test_open_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            path: Some(dir.path().join("desk").to_string_lossy().to_string()),
        };
        let storage = Storage::open(&config).unwrap();
        storage.set_raw("k", "v").unwrap();
        assert_eq!(storage.get_raw("k").unwrap().as_deref(), Some("v"));
    }
}
