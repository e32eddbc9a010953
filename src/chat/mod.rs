//! Per-user chat history
//!
//! Sessions live as one JSON array under `chatHistory_<user>`, ordered with
//! the most recently saved session first and capped at a fixed number of
//! entries. Every mutation rewrites the whole array.

use crate::error::{DeskError, Result};
use crate::storage::{chat_history_key, Storage};

pub mod assistant;
pub mod types;

pub use assistant::PendingReply;
pub use types::{derive_title, ChatMessage, ChatSession, Sender};

/// Sessions retained per user unless configured otherwise
pub const MAX_CHAT_SESSIONS: usize = 50;

/// Chat history of a single user
#[derive(Debug, Clone)]
pub struct ChatStore {
    storage: Storage,
    key: String,
    capacity: usize,
}

impl ChatStore {
    /// Open the history of `user` with the default cap
    pub fn new(storage: Storage, user: &str) -> Self {
        Self::with_capacity(storage, user, MAX_CHAT_SESSIONS)
    }

    /// Open the history of `user`, keeping at most `capacity` sessions
    pub fn with_capacity(storage: Storage, user: &str, capacity: usize) -> Self {
        Self {
            storage,
            key: chat_history_key(user),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of sessions kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All sessions, most recently saved first
    pub fn list(&self) -> Result<Vec<ChatSession>> {
        self.storage.load_list(&self.key)
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> Result<Option<ChatSession>> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    /// Insert or update a session and move it to the front
    ///
    /// The oldest sessions beyond the cap are dropped.
    pub fn save(&self, session: &ChatSession) -> Result<()> {
        let mut sessions = self.list()?;
        sessions.retain(|s| s.id != session.id);
        sessions.insert(0, session.clone());

        if sessions.len() > self.capacity {
            let evicted = sessions.len() - self.capacity;
            sessions.truncate(self.capacity);
            tracing::debug!("Evicted {} oldest chat session(s) from {}", evicted, self.key);
        }

        self.write(&sessions)
    }

    /// Set a custom title; a blank title restores the derived one
    ///
    /// Returns `false` when no session has that id. The session keeps its
    /// position in the list.
    pub fn rename(&self, id: &str, new_title: &str) -> Result<bool> {
        let mut sessions = self.list()?;
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };

        let trimmed = new_title.trim();
        session.custom_title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };

        self.write(&sessions)?;
        Ok(true)
    }

    /// Remove a session, returning whether it existed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut sessions = self.list()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.write(&sessions)?;
        Ok(true)
    }

    /// Sessions whose display title or last message contain `query`
    ///
    /// Matching is case-insensitive; a blank query returns everything.
    pub fn search(&self, query: &str) -> Result<Vec<ChatSession>> {
        let sessions = self.list()?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(sessions);
        }
        Ok(sessions.into_iter().filter(|s| s.matches(&needle)).collect())
    }

    /// Append a message to an existing session and save it
    ///
    /// Returns the updated session, or `None` if it no longer exists.
    pub fn append_message(&self, id: &str, message: ChatMessage) -> Result<Option<ChatSession>> {
        let Some(mut session) = self.get(id)? else {
            return Ok(None);
        };
        session.push(message);
        self.save(&session)?;
        Ok(Some(session))
    }

    /// Edit a user message in place and save the session
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotFound` if the session or message is unknown and
    /// `DeskError::Validation` for assistant messages
    pub fn edit_message(&self, id: &str, message_id: &str, content: &str) -> Result<ChatSession> {
        let mut session = self
            .get(id)?
            .ok_or_else(|| DeskError::NotFound(format!("chat {}", id)))?;
        session.edit_user_message(message_id, content)?;
        self.save(&session)?;
        Ok(session)
    }

    fn write(&self, sessions: &[ChatSession]) -> Result<()> {
        self.storage.save_json(&self.key, sessions)
    }
}
