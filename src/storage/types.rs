//! Change notifications broadcast by `Storage`

use serde::{Deserialize, Serialize};

/// Kind of mutation applied to a storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The key was written (created or overwritten)
    Set,
    /// The key was removed
    Removed,
}

/// Notification published on every successful storage mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Key that was mutated
    pub key: String,
    /// What happened to the key
    pub kind: ChangeKind,
}

impl StorageChange {
    pub(crate) fn set(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: ChangeKind::Set,
        }
    }

    pub(crate) fn removed(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: ChangeKind::Removed,
        }
    }
}
