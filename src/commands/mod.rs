/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`      - Interactive chat and one-shot `chat send`
- `history`   - List, search, show, rename, edit and delete chats
- `reminders` - List, add and delete reminders
- `workflows` - Browse the catalog and validate workflow inputs
- `settings`  - Read and change application settings
- `user`      - Show, log in, log out and list stored users

Handlers take the [`Desk`](crate::desk::Desk) built by `main` so every
command works against the same per-user stores.
*/

use crate::error::{DeskError, Result};

pub mod chat;
pub mod history;
pub mod reminders;
pub mod settings;
pub mod special_commands;
pub mod user;
pub mod workflows;

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(DeskError::Serialization)?;
    println!("{}", json);
    Ok(())
}
