//! Per-user reminders
//!
//! Reminders are stored as a JSON array under `userReminders_<user>` in
//! creation order. They are created from a validated [`ReminderDraft`] and
//! otherwise only ever deleted.

use crate::error::Result;
use crate::storage::{reminders_key, Storage, StorageChange};
use tokio::sync::broadcast;
use ulid::Ulid;

pub mod badge;
pub mod types;

pub use badge::ReminderBadge;
pub use types::{
    CachedQuery, Priority, Reminder, ReminderDraft, ReminderStatus, RepeatInterval,
};

/// Reminders of a single user
#[derive(Debug, Clone)]
pub struct ReminderStore {
    storage: Storage,
    key: String,
}

impl ReminderStore {
    /// Open the reminders of `user`
    pub fn new(storage: Storage, user: &str) -> Self {
        Self {
            storage,
            key: reminders_key(user),
        }
    }

    /// Storage key this store writes to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Change notifications for the whole storage namespace
    ///
    /// Filter on [`ReminderStore::key`] to see only this user's reminders.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.storage.subscribe()
    }

    /// All reminders in creation order
    pub fn list(&self) -> Result<Vec<Reminder>> {
        self.storage.load_list(&self.key)
    }

    /// Number of stored reminders
    pub fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// Validate and append a new reminder
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` if the draft is incomplete; nothing is
    /// written in that case
    pub fn add(&self, draft: ReminderDraft) -> Result<Reminder> {
        draft.validate()?;

        let reminder = draft.into_reminder(Ulid::new().to_string());
        let mut reminders = self.list()?;
        reminders.push(reminder.clone());
        self.storage.save_json(&self.key, &reminders)?;

        tracing::info!(
            "Added {} priority reminder '{}' for {}",
            reminder.priority,
            reminder.title,
            reminder.scheduled_for()
        );
        Ok(reminder)
    }

    /// Remove a reminder, returning whether it existed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut reminders = self.list()?;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return Ok(false);
        }
        self.storage.save_json(&self.key, &reminders)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ReminderStore {
        ReminderStore::new(Storage::in_memory(), "ana")
    }

    #[test]
    fn test_add_list_delete_scenario() {
        let store = store();
        let added = store
            .add(ReminderDraft::new("X", "2025-01-01", "09:00").with_priority(Priority::High))
            .unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "X");
        assert_eq!(list[0].priority, Priority::High);

        assert!(store.delete(&added.id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_appends_in_order() {
        let store = store();
        store
            .add(ReminderDraft::new("first", "2025-01-01", "09:00"))
            .unwrap();
        store
            .add(ReminderDraft::new("second", "2025-01-02", "10:30"))
            .unwrap();

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_add_generates_distinct_ids() {
        let store = store();
        let a = store
            .add(ReminderDraft::new("a", "2025-01-01", "09:00"))
            .unwrap();
        let b = store
            .add(ReminderDraft::new("b", "2025-01-01", "09:00"))
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_invalid_draft_writes_nothing() {
        let store = store();
        assert!(store
            .add(ReminderDraft::new("", "2025-01-01", "09:00"))
            .is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_id() {
        let store = store();
        store
            .add(ReminderDraft::new("keep", "2025-01-01", "09:00"))
            .unwrap();
        assert!(!store.delete("missing").unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_malformed_reminders_read_empty() {
        let storage = Storage::in_memory();
        storage.set_raw(&reminders_key("ana"), "not json").unwrap();
        let store = ReminderStore::new(storage, "ana");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_reminders_are_per_user() {
        let storage = Storage::in_memory();
        let ana = ReminderStore::new(storage.clone(), "ana");
        let ben = ReminderStore::new(storage, "ben");
        ana.add(ReminderDraft::new("mine", "2025-01-01", "09:00"))
            .unwrap();
        assert_eq!(ben.count().unwrap(), 0);
    }
}
