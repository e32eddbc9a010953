//! ConsultDesk - consulting assistant desk library
//!
//! This library provides the core of the ConsultDesk assistant: per-user
//! chat history and reminders over an injected key-value store, a static
//! workflow catalog, fire-and-forget search webhooks and the desk state
//! that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Key-value backends (sled, in-memory) and change notifications
//! - `chat`: Chat sessions, the history store and deferred assistant replies
//! - `reminders`: Reminder store and the live reminder badge
//! - `workflows`: Built-in workflow definitions and input validation
//! - `webhook`: Search webhook payloads and dispatch
//! - `settings`, `user`: App settings and the logged-in user
//! - `router`, `desk`: View state and the composed application
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use consultdesk::{ChatInput, Config, Desk, Storage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let mut desk = Desk::new(config, Storage::in_memory())?;
//!     desk.send_message(ChatInput::new("Prepare the Acme briefing"))?;
//!     let reply = desk.await_reply().await;
//!     println!("{:?}", reply.map(|m| m.content));
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod desk;
pub mod error;
pub mod reminders;
pub mod router;
pub mod settings;
pub mod storage;
pub mod user;
pub mod webhook;
pub mod workflows;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatSession, ChatStore};
pub use config::Config;
pub use desk::{ChatInput, Desk};
pub use error::{DeskError, Result};
pub use reminders::{Reminder, ReminderDraft, ReminderStore};
pub use router::{ActiveView, ViewRouter};
pub use storage::{KeyValueStore, MemoryStore, SledStore, Storage};
pub use webhook::{DispatchOutcome, SearchType, WebhookDispatcher};

#[cfg(test)]
pub mod test_utils;
