//! Chat sessions, messages and their persisted form

use crate::error::{DeskError, Result};
use crate::webhook::SearchType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ulid::Ulid;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id (ULID)
    pub id: String,
    /// Message text
    pub content: String,
    /// Who wrote the message
    pub sender: Sender,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message stamped now
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    /// Create an assistant message stamped now
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Assistant)
    }
}

/// One conversation thread and its message log
///
/// Serialized with camelCase field names so stored histories keep the
/// browser-era layout (`customTitle`, `lastMessage`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session id (ULID, sortable by creation time)
    pub id: String,
    /// Title derived from the first user message
    pub title: String,
    /// Title chosen by the user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    /// Content of the most recent message
    #[serde(default)]
    pub last_message: String,
    /// Last time the session changed
    pub timestamp: DateTime<Utc>,
    /// Search type the session was started with
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_search_type"
    )]
    pub search_type: Option<SearchType>,
    /// Client the session was started about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Ordered message log
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

// Older histories store an empty string when no search type was picked.
fn lenient_search_type<'de, D>(deserializer: D) -> std::result::Result<Option<SearchType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl ChatSession {
    /// Start a session from the user's first message
    ///
    /// # Examples
    ///
    /// ```
    /// use consultdesk::chat::ChatSession;
    ///
    /// let session = ChatSession::start("  Prepare the Acme briefing  ", 50, None, None);
    /// assert_eq!(session.title, "Prepare the Acme briefing");
    /// assert_eq!(session.messages.len(), 1);
    /// assert_eq!(session.last_message, "  Prepare the Acme briefing  ");
    /// ```
    pub fn start(
        first_message: &str,
        title_max_chars: usize,
        search_type: Option<SearchType>,
        client_name: Option<String>,
    ) -> Self {
        let message = ChatMessage::user(first_message);
        Self {
            id: Ulid::new().to_string(),
            title: derive_title(first_message, title_max_chars),
            custom_title: None,
            last_message: message.content.clone(),
            timestamp: message.timestamp,
            search_type,
            client_name,
            messages: vec![message],
        }
    }

    /// Title shown in lists: the custom title when set, else the derived one
    pub fn display_title(&self) -> &str {
        self.custom_title.as_deref().unwrap_or(&self.title)
    }

    /// Append a message and refresh the preview and timestamp
    pub fn push(&mut self, message: ChatMessage) {
        self.last_message = message.content.clone();
        self.timestamp = message.timestamp;
        self.messages.push(message);
    }

    /// Replace the content of one of the user's messages
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotFound` for an unknown message id and
    /// `DeskError::Validation` when the message was written by the assistant
    pub fn edit_user_message(&mut self, message_id: &str, content: &str) -> Result<()> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| DeskError::NotFound(format!("message {}", message_id)))?;

        if self.messages[index].sender != Sender::User {
            return Err(
                DeskError::Validation("Only user messages can be edited".to_string()).into(),
            );
        }

        self.messages[index].content = content.to_string();
        if index + 1 == self.messages.len() {
            self.last_message = content.to_string();
        }
        self.timestamp = Utc::now();
        Ok(())
    }

    /// Whether the query matches the display title or the last message
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.display_title().to_lowercase().contains(needle)
            || self.last_message.to_lowercase().contains(needle)
    }
}

/// Derive a session title from the first message
///
/// Trims whitespace and keeps at most `max_chars` characters, appending
/// `...` when something was cut.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_text_is_kept() {
        assert_eq!(derive_title("  Q3 report  ", 50), "Q3 report");
    }

    #[test]
    fn test_derive_title_truncates_on_char_boundary() {
        let title = derive_title("Überprüfung der Quartalszahlen", 5);
        assert_eq!(title, "Überp...");
    }

    #[test]
    fn test_display_title_prefers_custom() {
        let mut session = ChatSession::start("Original", 50, None, None);
        assert_eq!(session.display_title(), "Original");
        session.custom_title = Some("Renamed".to_string());
        assert_eq!(session.display_title(), "Renamed");
    }

    #[test]
    fn test_push_updates_preview() {
        let mut session = ChatSession::start("Hello", 50, None, None);
        session.push(ChatMessage::assistant("Hi there"));
        assert_eq!(session.last_message, "Hi there");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].sender, Sender::Assistant);
    }

    #[test]
    fn test_edit_user_message_updates_last_preview() {
        let mut session = ChatSession::start("Helo", 50, None, None);
        let id = session.messages[0].id.clone();
        session.edit_user_message(&id, "Hello").unwrap();
        assert_eq!(session.messages[0].content, "Hello");
        assert_eq!(session.last_message, "Hello");
    }

    #[test]
    fn test_edit_earlier_message_keeps_preview() {
        let mut session = ChatSession::start("first", 50, None, None);
        let id = session.messages[0].id.clone();
        session.push(ChatMessage::assistant("reply"));
        session.edit_user_message(&id, "first, edited").unwrap();
        assert_eq!(session.last_message, "reply");
    }

    #[test]
    fn test_edit_assistant_message_rejected() {
        let mut session = ChatSession::start("q", 50, None, None);
        session.push(ChatMessage::assistant("a"));
        let id = session.messages[1].id.clone();
        assert!(session.edit_user_message(&id, "hijack").is_err());
        assert_eq!(session.messages[1].content, "a");
    }

    #[test]
    fn test_edit_unknown_message_not_found() {
        let mut session = ChatSession::start("q", 50, None, None);
        let err = session.edit_user_message("missing", "x").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let mut session =
            ChatSession::start("Hello", 50, Some(SearchType::Client), Some("acme-corp".into()));
        session.custom_title = Some("Acme".to_string());
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["customTitle"], "Acme");
        assert_eq!(value["lastMessage"], "Hello");
        assert_eq!(value["searchType"], "client");
        assert_eq!(value["clientName"], "acme-corp");
        assert_eq!(value["messages"][0]["sender"], "user");
    }

    #[test]
    fn test_empty_search_type_reads_as_none() {
        let json = r#"{
            "id": "1",
            "title": "Legacy",
            "lastMessage": "hi",
            "timestamp": "2025-01-01T09:00:00Z",
            "searchType": "",
            "messages": []
        }"#;
        let session: ChatSession = serde_json::from_str(json).unwrap();
        assert!(session.search_type.is_none());
        assert!(session.custom_title.is_none());
    }
}
