//! Embedded on-disk backend built on `sled`

use super::KeyValueStore;
use crate::error::{DeskError, Result};
use std::path::{Path, PathBuf};

/// Key-value backend persisted in an embedded `sled` database
///
/// Every write is flushed before returning so that a crash never loses an
/// acknowledged save. sled locks the database directory exclusively, so a
/// store can only be open in one process at a time.
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledStore {
    /// Open or create a store at the given directory
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Storage` if the database cannot be opened. When
    /// another process (or another handle in this one) already holds the
    /// store, the message says the store is in use.
    ///
    /// # Examples
    ///
    /// ```
    /// use consultdesk::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> consultdesk::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("desk"))?;
    /// store.set("currentUser", "ana@example.com")?;
    /// assert_eq!(store.get("currentUser")?.as_deref(), Some("ana@example.com"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DeskError::Storage(format!("Failed to create parent directory: {}", e))
            })?;
        }

        let db = sled::open(&path).map_err(|e| {
            if is_lock_error(&e) {
                DeskError::Storage(format!(
                    "Store at {} is in use by another consultdesk process; close it and retry",
                    path.display()
                ))
            } else {
                DeskError::Storage(format!("Failed to open database: {}", e))
            }
        })?;
        tracing::debug!("Opened sled store at {}", path.display());

        Ok(Self { db, path })
    }

    /// Directory backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| DeskError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

// sled reports a held lock as a plain I/O error.
fn is_lock_error(error: &sled::Error) -> bool {
    matches!(error, sled::Error::Io(_)) && error.to_string().contains("could not acquire lock")
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| DeskError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    DeskError::Storage(format!("Value for {} is not UTF-8: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| DeskError::Storage(format!("Insert failed: {}", e)))?;
        self.flush()
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let previous = self
            .db
            .remove(key.as_bytes())
            .map_err(|e| DeskError::Storage(format!("Remove failed: {}", e)))?;
        self.flush()?;
        Ok(previous.is_some())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, _) =
                entry.map_err(|e| DeskError::Storage(format!("Iteration failed: {}", e)))?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }
}
