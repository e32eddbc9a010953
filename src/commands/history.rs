//! `history` subcommand: list, search, show, rename, edit and delete stored chats

use crate::chat::{ChatSession, Sender};
use crate::cli::HistoryCommand;
use crate::desk::Desk;
use crate::error::{DeskError, Result};
use colored::Colorize;
use prettytable::{format, Table};

use super::print_json;

const TITLE_COLUMN_CHARS: usize = 40;

/// Handle history commands
pub fn handle_history(desk: &mut Desk, command: HistoryCommand) -> Result<()> {
    let store = desk.chat_store();

    match command {
        HistoryCommand::List { json } => {
            let sessions = store.list()?;
            if json {
                return print_json(&sessions);
            }
            print_sessions(&sessions, "Chat History");
        }
        HistoryCommand::Search { query } => {
            let sessions = store.search(&query)?;
            print_sessions(&sessions, &format!("Chats matching '{}'", query));
        }
        HistoryCommand::Show { id } => {
            let session = store
                .get(&id)?
                .ok_or_else(|| DeskError::NotFound(format!("chat {}", id)))?;
            print_transcript(&session);
        }
        HistoryCommand::Rename { id, title } => {
            if !store.rename(&id, &title)? {
                return Err(DeskError::NotFound(format!("chat {}", id)).into());
            }
            if title.trim().is_empty() {
                println!("{}", format!("Restored original title of {}", id).green());
            } else {
                println!("{}", format!("Renamed {} to '{}'", id, title.trim()).green());
            }
        }
        HistoryCommand::Edit {
            id,
            message_id,
            content,
        } => {
            store.edit_message(&id, &message_id, &content)?;
            println!("{}", format!("Updated message {}", message_id).green());
        }
        HistoryCommand::Delete { id } => {
            if desk.delete_chat(&id)? {
                println!("{}", format!("Deleted chat {}", id).green());
            } else {
                println!("{}", format!("No chat with ID {}", id).yellow());
            }
        }
    }

    Ok(())
}

/// Print sessions as a table
pub(crate) fn print_sessions(sessions: &[ChatSession], heading: &str) {
    if sessions.is_empty() {
        println!("{}", "No chat history found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Search".bold(),
        "Messages".bold(),
        "Last Updated".bold()
    ]);

    for session in sessions {
        let title = truncate(session.display_title(), TITLE_COLUMN_CHARS);
        let search = session
            .search_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let updated = session.timestamp.format("%Y-%m-%d %H:%M").to_string();

        table.add_row(prettytable::row![
            session.id.cyan(),
            title,
            search,
            session.messages.len(),
            updated
        ]);
    }

    println!("\n{}:", heading);
    table.printstd();
    println!();
}

/// Print every message of a session
pub(crate) fn print_transcript(session: &ChatSession) {
    println!("\n{}", session.display_title().bold());
    if let Some(search_type) = session.search_type {
        match &session.client_name {
            Some(client) => println!("Search: {} ({})", search_type, client),
            None => println!("Search: {}", search_type),
        }
    }
    println!();

    for message in &session.messages {
        let who = match message.sender {
            Sender::User => "You".blue().bold(),
            Sender::Assistant => "Assistant".green().bold(),
        };
        println!(
            "{} {} {}",
            message.timestamp.format("%H:%M").to_string().dimmed(),
            who,
            format!("[{}]", message.id).dimmed()
        );
        println!("  {}", message.content);
    }
    println!();
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
