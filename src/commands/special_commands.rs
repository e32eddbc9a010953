//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` are desk commands rather than chat messages.
//! Command names are case-insensitive; arguments (chat IDs, titles, paths)
//! keep their case.

use crate::router::ActiveView;
use crate::webhook::SearchType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands available inside the chat REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a fresh chat
    NewChat,

    /// List saved chats
    ListChats,

    /// Open a saved chat and print it
    OpenChat(String),

    /// Search saved chats
    SearchChats(String),

    /// Set or clear a chat's custom title
    RenameChat { id: String, title: String },

    /// Delete a saved chat
    DeleteChat(String),

    /// Tag following messages with a search type; `None` clears it
    SetSearchType(Option<SearchType>),

    /// Client for "my client" searches; `None` clears it
    SetClient(Option<String>),

    /// Describe a file in the next webhook; `None` clears it
    Attach(Option<PathBuf>),

    /// Switch views
    SwitchView(ActiveView),

    /// Select a workflow (switches to the workflows view)
    SelectWorkflow(String),

    /// Show user, view and selections
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send as a message
    None,
}

const CLEAR_WORDS: [&str; 3] = ["none", "off", "clear"];

fn split_command(trimmed: &str) -> (String, &str) {
    match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    }
}

fn required<'a>(command: &str, arg: &'a str, usage: &str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg)
    }
}

fn is_clear(arg: &str) -> bool {
    arg.is_empty() || CLEAR_WORDS.contains(&arg.to_lowercase().as_str())
}

/// Parse a REPL line into a special command
///
/// `exit` and `quit` work with or without the slash. Anything else not
/// starting with `/` is [`SpecialCommand::None`].
///
/// # Errors
///
/// Returns `CommandError` for unknown commands, missing arguments and
/// unparseable arguments.
///
/// # Examples
///
/// ```
/// use consultdesk::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (name, arg) = split_command(trimmed);
    match name.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/list" | "/history" => Ok(SpecialCommand::ListChats),
        "/open" => required("/open", arg, "/open <chat_id>")
            .map(|id| SpecialCommand::OpenChat(id.to_string())),
        "/search" => required("/search", arg, "/search <text>")
            .map(|q| SpecialCommand::SearchChats(q.to_string())),
        "/rename" => {
            let arg = required("/rename", arg, "/rename <chat_id> [title]")?;
            let (id, title) = match arg.split_once(char::is_whitespace) {
                Some((id, title)) => (id, title.trim()),
                None => (arg, ""),
            };
            Ok(SpecialCommand::RenameChat {
                id: id.to_string(),
                title: title.to_string(),
            })
        }
        "/delete" => required("/delete", arg, "/delete <chat_id>")
            .map(|id| SpecialCommand::DeleteChat(id.to_string())),
        "/search-type" => {
            if is_clear(arg) {
                return Ok(SpecialCommand::SetSearchType(None));
            }
            arg.parse::<SearchType>()
                .map(|t| SpecialCommand::SetSearchType(Some(t)))
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/search-type".to_string(),
                    arg: arg.to_string(),
                })
        }
        "/client" => Ok(SpecialCommand::SetClient(
            (!is_clear(arg)).then(|| arg.to_string()),
        )),
        "/attach" => Ok(SpecialCommand::Attach(
            (!is_clear(arg)).then(|| PathBuf::from(arg)),
        )),
        "/view" => {
            let arg = required("/view", arg, "/view <chat|workflows|reminders>")?;
            arg.parse::<ActiveView>()
                .map(SpecialCommand::SwitchView)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/view".to_string(),
                    arg: arg.to_string(),
                })
        }
        "/workflow" => required("/workflow", arg, "/workflow <workflow_id>")
            .map(|id| SpecialCommand::SelectWorkflow(id.to_string())),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help for the interactive chat
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

CHATS:
  /new                    - Start a new chat
  /list                   - List saved chats
  /open <id>              - Open a saved chat
  /search <text>          - Search chats by title or last message
  /rename <id> [title]    - Rename a chat (no title restores the original)
  /delete <id>            - Delete a chat

SEARCH CONTEXT:
  /search-type <type>     - client, company, financials or crm (none to clear)
  /client <name>          - Client for "my client" searches (none to clear)
  /attach <path>          - Describe a file in the next search (none to clear)

VIEWS:
  /view <name>            - chat, workflows or reminders
  /workflow <id>          - Select a workflow
  /status                 - Show user, view and selections

SESSION CONTROL:
  /help                   - Show this help message
  /exit                   - Exit interactive mode (also: exit, quit)

NOTES:
  - Commands are case-insensitive; IDs and titles are not
  - Regular text (not starting with /) is sent as a message
  - Messages with a search type also notify the search webhook
"#
    );
}
