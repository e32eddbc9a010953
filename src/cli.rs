//! Command-line interface definition for ConsultDesk
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, history, reminders, workflows, settings
//! and the logged-in user.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ConsultDesk - consulting assistant desk
///
/// Chat with the assistant, run workflows and keep reminders, all stored
/// locally per user.
#[derive(Parser, Debug, Clone)]
#[command(name = "consultdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the storage directory
    #[arg(long)]
    pub store: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ConsultDesk
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Chat with the assistant (interactive unless a subcommand is given)
    Chat {
        /// Resume an existing chat session
        #[arg(short, long)]
        resume: Option<String>,

        /// Start in the workflows view with this workflow selected
        #[arg(short, long)]
        workflow: Option<String>,

        /// One-shot chat subcommand
        #[command(subcommand)]
        command: Option<ChatCommand>,
    },

    /// Browse and manage chat history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Manage reminders
    Reminders {
        /// Reminder subcommand
        #[command(subcommand)]
        command: ReminderCommand,
    },

    /// Browse and run workflows
    Workflows {
        /// Workflow subcommand
        #[command(subcommand)]
        command: WorkflowCommand,
    },

    /// View and change application settings
    Settings {
        /// Settings subcommand
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Show or change the logged-in user
    User {
        /// User subcommand
        #[command(subcommand)]
        command: UserCommand,
    },
}

/// One-shot chat subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatCommand {
    /// Send a single message and wait for the reply
    Send {
        /// Message text
        message: String,

        /// Append to this chat instead of starting a new one
        #[arg(long)]
        chat: Option<String>,

        /// Search type for the webhook (client, company, financials, crm)
        #[arg(short, long)]
        search_type: Option<String>,

        /// Client the search is about
        #[arg(long)]
        client: Option<String>,

        /// File to describe in the webhook payload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Chat history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List chat sessions, most recent first
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Search sessions by title or last message
    Search {
        /// Text to look for
        query: String,
    },

    /// Show every message of a session
    Show {
        /// Session ID
        id: String,
    },

    /// Rename a session (an empty title restores the original)
    Rename {
        /// Session ID
        id: String,

        /// New title
        #[arg(default_value = "")]
        title: String,
    },

    /// Change the text of one of your messages
    Edit {
        /// Session ID
        id: String,

        /// Message ID
        message_id: String,

        /// Replacement text
        content: String,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },
}

/// Reminder subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ReminderCommand {
    /// List reminders
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a reminder
    Add {
        /// Reminder title
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Time (HH:MM)
        #[arg(short, long)]
        time: String,

        /// Priority: low, medium, high or urgent
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Longer description
        #[arg(long, default_value = "")]
        description: String,

        /// Search type to cache with the reminder
        #[arg(short, long)]
        search_type: Option<String>,

        /// Client for the cached search
        #[arg(long)]
        client: Option<String>,

        /// Custom query for the cached search
        #[arg(short, long)]
        query: Option<String>,

        /// Repeat: none, daily, weekly or monthly
        #[arg(short, long, default_value = "none")]
        repeat: String,
    },

    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: String,
    },
}

/// Workflow subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum WorkflowCommand {
    /// List workflows
    List {
        /// Only workflows whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a workflow and its fields
    Show {
        /// Workflow ID
        id: String,
    },

    /// Validate inputs for a workflow and optionally send it a message
    Run {
        /// Workflow ID
        id: String,

        /// Field value as name=value (repeatable)
        #[arg(short, long = "input", value_name = "NAME=VALUE")]
        inputs: Vec<String>,

        /// Message to send to the workflow assistant
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// List all settings
    List,

    /// Print one setting
    Get {
        /// Setting name
        name: String,
    },

    /// Change one setting
    Set {
        /// Setting name
        name: String,

        /// New value (true/false, a number, or text)
        value: String,
    },

    /// Restore the defaults
    Reset,
}

/// User subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// Show the current user
    Show,

    /// Log in with an email address
    Login {
        /// Email address
        email: String,
    },

    /// Log out
    Logout,

    /// List users with stored chats or reminders
    List,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            store: None,
            command: Commands::User {
                command: UserCommand::Show,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.store.is_none());
        assert!(matches!(
            cli.command,
            Commands::User {
                command: UserCommand::Show
            }
        ));
    }

    #[test]
    fn test_cli_parse_interactive_chat() {
        let cli = Cli::try_parse_from(["consultdesk", "chat"]).unwrap();
        if let Commands::Chat {
            resume,
            workflow,
            command,
        } = cli.command
        {
            assert!(resume.is_none());
            assert!(workflow.is_none());
            assert!(command.is_none());
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_send() {
        let cli = Cli::try_parse_from([
            "consultdesk",
            "chat",
            "send",
            "open invoices",
            "--search-type",
            "client",
            "--client",
            "acme-corp",
        ])
        .unwrap();
        if let Commands::Chat {
            command:
                Some(ChatCommand::Send {
                    message,
                    search_type,
                    client,
                    chat,
                    file,
                }),
            ..
        } = cli.command
        {
            assert_eq!(message, "open invoices");
            assert_eq!(search_type.as_deref(), Some("client"));
            assert_eq!(client.as_deref(), Some("acme-corp"));
            assert!(chat.is_none());
            assert!(file.is_none());
        } else {
            panic!("Expected chat send");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "consultdesk",
            "--verbose",
            "--store",
            "/tmp/desk",
            "--config",
            "custom.yaml",
            "user",
            "show",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.store.as_deref(), Some("/tmp/desk"));
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    }

    #[test]
    fn test_cli_parse_history_rename_without_title() {
        let cli = Cli::try_parse_from(["consultdesk", "history", "rename", "01ABC"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::Rename { id, title },
        } = cli.command
        {
            assert_eq!(id, "01ABC");
            assert_eq!(title, "");
        } else {
            panic!("Expected history rename");
        }
    }

    #[test]
    fn test_cli_parse_reminder_add() {
        let cli = Cli::try_parse_from([
            "consultdesk",
            "reminders",
            "add",
            "Call Acme",
            "--date",
            "2025-01-01",
            "--time",
            "09:00",
            "--priority",
            "high",
        ])
        .unwrap();
        if let Commands::Reminders {
            command:
                ReminderCommand::Add {
                    title,
                    date,
                    time,
                    priority,
                    repeat,
                    ..
                },
        } = cli.command
        {
            assert_eq!(title, "Call Acme");
            assert_eq!(date, "2025-01-01");
            assert_eq!(time, "09:00");
            assert_eq!(priority, "high");
            assert_eq!(repeat, "none");
        } else {
            panic!("Expected reminders add");
        }
    }

    #[test]
    fn test_cli_reminder_add_requires_date() {
        let result = Cli::try_parse_from(["consultdesk", "reminders", "add", "x", "--time", "09:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_workflow_run_inputs() {
        let cli = Cli::try_parse_from([
            "consultdesk",
            "workflows",
            "run",
            "financial-analysis",
            "--input",
            "analysisType=cash-flow",
            "-i",
            "period=annual",
        ])
        .unwrap();
        if let Commands::Workflows {
            command: WorkflowCommand::Run { id, inputs, message },
        } = cli.command
        {
            assert_eq!(id, "financial-analysis");
            assert_eq!(inputs, vec!["analysisType=cash-flow", "period=annual"]);
            assert!(message.is_none());
        } else {
            panic!("Expected workflows run");
        }
    }

    #[test]
    fn test_cli_parse_settings_set() {
        let cli = Cli::try_parse_from(["consultdesk", "settings", "set", "darkMode", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::Set { .. }
            }
        ));
    }

    #[test]
    fn test_cli_parse_user_login() {
        let cli = Cli::try_parse_from(["consultdesk", "user", "login", "ana@example.com"]).unwrap();
        if let Commands::User {
            command: UserCommand::Login { email },
        } = cli.command
        {
            assert_eq!(email, "ana@example.com");
        } else {
            panic!("Expected user login");
        }
    }
}
