//! Chat command handlers
//!
//! `run_chat` drives the interactive REPL: plain lines are sent as
//! messages, `/` lines are desk commands. `send_once` posts a single
//! message and waits for the assistant before returning.

use crate::chat::ChatSession;
use crate::cli::ChatCommand;
use crate::commands::history::{print_sessions, print_transcript};
use crate::commands::reminders::print_reminders;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::desk::{ChatInput, Desk, SentMessage};
use crate::error::{DeskError, Result};
use crate::reminders::ReminderBadge;
use crate::router::ActiveView;
use crate::webhook::{DispatchOutcome, FileAttachment, SearchType};
use crate::workflows;
use chrono::Timelike;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Search context applied to every message sent from the REPL
#[derive(Debug, Default)]
struct SearchContext {
    search_type: Option<SearchType>,
    client: Option<String>,
    attachment: Option<FileAttachment>,
}

impl SearchContext {
    /// Build the input for `text`; the attachment is used once
    fn input(&mut self, text: &str) -> ChatInput {
        let mut input = ChatInput::new(text);
        if let Some(search_type) = self.search_type {
            input = input.with_search(search_type, self.client.clone());
            if let Some(file) = self.attachment.take() {
                input = input.with_file(file);
            }
        }
        input
    }

    fn describe(&self) -> String {
        match (self.search_type, &self.client) {
            (None, _) => "none".to_string(),
            (Some(t), Some(client)) => format!("{} ({})", t, client),
            (Some(t), None) => t.to_string(),
        }
    }
}

/// Start the interactive chat
///
/// # Arguments
///
/// * `desk` - Desk to drive
/// * `resume` - Optional chat ID to reopen
/// * `workflow` - Optional workflow ID to start in
pub async fn run_chat(
    desk: &mut Desk,
    resume: Option<String>,
    workflow: Option<String>,
) -> Result<()> {
    if let Some(id) = resume {
        let session = require_session(desk, &id)?;
        desk.select_chat(&session.id);
        print_transcript(&session);
    }
    if let Some(id) = workflow {
        select_workflow(desk, &id)?;
    }

    let mut rl = DefaultEditor::new()?;
    let mut badge = desk.spawn_badge();
    let mut context = SearchContext::default();

    print_welcome_banner(desk, &badge);

    loop {
        let prompt = format_prompt(desk, &badge);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let command = match parse_special_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}\n", e.to_string().red());
                        continue;
                    }
                };

                let user_before = desk.user().to_string();
                let result = match command {
                    SpecialCommand::Exit => break,
                    SpecialCommand::None => send_line(desk, &mut context, &line).await,
                    other => handle_special(desk, &mut context, other),
                };
                if let Err(e) = result {
                    println!("{} {}\n", "Error:".red().bold(), e);
                }

                // The badge follows one user's reminders.
                if desk.user() != user_before {
                    badge.shutdown().await;
                    badge = desk.spawn_badge();
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    badge.shutdown().await;
    println!("Goodbye!");
    Ok(())
}

/// Send one message and wait for the assistant
pub async fn send_once(desk: &mut Desk, command: ChatCommand) -> Result<()> {
    let ChatCommand::Send {
        message,
        chat,
        search_type,
        client,
        file,
    } = command;

    if let Some(id) = chat {
        let session = require_session(desk, &id)?;
        desk.select_chat(&session.id);
    }

    let mut input = ChatInput::new(message);
    if let Some(search_type) = search_type {
        input = input.with_search(search_type.parse()?, client);
    }
    if let Some(path) = file {
        if input.search_type.is_none() {
            tracing::warn!("--file is only sent with a search type; ignoring it");
        } else {
            input = input.with_file(FileAttachment::from_path(path)?);
        }
    }

    let Some(sent) = desk.send_message(input)? else {
        return Err(DeskError::Validation("Message must not be blank".to_string()).into());
    };
    let session_id = sent.session.id.clone();
    report_webhook(sent).await;

    if let Some(reply) = desk.await_reply().await {
        println!("{} {}", "Assistant:".green().bold(), reply.content);
    }
    println!("{}", format!("Chat ID: {}", session_id).dimmed());
    Ok(())
}

async fn send_line(desk: &mut Desk, context: &mut SearchContext, line: &str) -> Result<()> {
    let sent = match desk.router().view() {
        ActiveView::Chat => desk.send_message(context.input(line))?,
        ActiveView::Workflows => desk.send_workflow_message(context.input(line))?,
        ActiveView::Reminders => {
            println!(
                "{}\n",
                "Messages are sent from the chat or workflows view (/view chat).".yellow()
            );
            return Ok(());
        }
    };
    if sent.is_none() {
        return Ok(());
    }

    println!("{}", "Assistant is typing...".dimmed());
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    match desk.await_reply_until(interrupt).await {
        Some(reply) => println!("\n{} {}\n", "Assistant:".green().bold(), reply.content),
        None => println!("{}\n", "Reply cancelled".yellow()),
    }
    Ok(())
}

fn handle_special(
    desk: &mut Desk,
    context: &mut SearchContext,
    command: SpecialCommand,
) -> Result<()> {
    match command {
        SpecialCommand::NewChat => {
            desk.new_chat();
            println!("{}\n", "Started a new chat".green());
        }
        SpecialCommand::ListChats => {
            print_sessions(&desk.chat_store().list()?, "Chat History");
        }
        SpecialCommand::OpenChat(id) => {
            let session = require_session(desk, &id)?;
            desk.select_chat(&session.id);
            print_transcript(&session);
        }
        SpecialCommand::SearchChats(query) => {
            let found = desk.chat_store().search(&query)?;
            print_sessions(&found, &format!("Chats matching '{}'", query));
        }
        SpecialCommand::RenameChat { id, title } => {
            if !desk.chat_store().rename(&id, &title)? {
                return Err(DeskError::NotFound(format!("chat {}", id)).into());
            }
            println!("{}\n", format!("Renamed chat {}", id).green());
        }
        SpecialCommand::DeleteChat(id) => {
            if desk.delete_chat(&id)? {
                println!("{}\n", format!("Deleted chat {}", id).green());
            } else {
                println!("{}\n", format!("No chat with ID {}", id).yellow());
            }
        }
        SpecialCommand::SetSearchType(search_type) => {
            context.search_type = search_type;
            match search_type {
                Some(t) => {
                    let label = desk.config().company.search_label(t);
                    println!("Searching {}\n", label.cyan());
                }
                None => {
                    context.attachment = None;
                    println!("Search cleared\n");
                }
            }
        }
        SpecialCommand::SetClient(client) => {
            if let Some(value) = &client {
                let label = desk.config().company.client_label(value);
                println!("Client: {}\n", label.cyan());
            } else {
                println!("Client cleared\n");
            }
            context.client = client;
        }
        SpecialCommand::Attach(path) => match path {
            Some(path) => {
                let file = FileAttachment::from_path(&path)?;
                println!(
                    "Attached {} ({} bytes, {})\n",
                    file.name.cyan(),
                    file.size,
                    file.mime_type
                );
                if context.search_type.is_none() {
                    println!(
                        "{}\n",
                        "Set a search type to include the file in the next search".yellow()
                    );
                }
                context.attachment = Some(file);
            }
            None => {
                context.attachment = None;
                println!("Attachment cleared\n");
            }
        },
        SpecialCommand::SwitchView(view) => {
            desk.set_view(view);
            println!("Switched to {}\n", view.colored_tag());
            if view == ActiveView::Reminders {
                print_reminders(&desk.reminder_store().list()?);
            }
        }
        SpecialCommand::SelectWorkflow(id) => select_workflow(desk, &id)?,
        SpecialCommand::ShowStatus => print_status(desk, context),
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit | SpecialCommand::None => {}
    }
    Ok(())
}

fn select_workflow(desk: &mut Desk, id: &str) -> Result<()> {
    let workflow =
        workflows::by_id(id).ok_or_else(|| DeskError::NotFound(format!("workflow {}", id)))?;
    desk.select_workflow(workflow.id);
    println!(
        "Selected workflow {}: {}\n",
        workflow.name.bold(),
        workflow.description
    );
    Ok(())
}

fn require_session(desk: &Desk, id: &str) -> Result<ChatSession> {
    desk.chat_store()
        .get(id)?
        .ok_or_else(|| DeskError::NotFound(format!("chat {}", id)).into())
}

async fn report_webhook(sent: SentMessage) {
    let Some(handle) = sent.webhook else {
        return;
    };
    match handle.await {
        Ok(DispatchOutcome::Sent) => println!("{}", "Search request sent".dimmed()),
        Ok(DispatchOutcome::Failed { reason }) => {
            println!("{}", format!("Search request failed: {}", reason).yellow())
        }
        Err(e) => tracing::warn!("Webhook task failed: {}", e),
    }
}

fn format_prompt(desk: &Desk, badge: &ReminderBadge) -> String {
    let reminders = match badge.count() {
        0 => String::new(),
        n => format!(" {}", format!("({} reminders)", n).yellow()),
    };
    format!("{}{} >> ", desk.router().view().colored_tag(), reminders)
}

fn print_welcome_banner(desk: &Desk, badge: &ReminderBadge) {
    let hour = chrono::Local::now().hour();
    let company = &desk.config().company;

    println!();
    println!("{}", company.name.bold());
    println!("{}", desk.greeting_line(hour).cyan());
    println!("Signed in as {}", desk.user());
    if badge.count() > 0 {
        println!("{}", format!("You have {} reminder(s)", badge.count()).yellow());
    }
    println!("Type {} for commands, {} to leave\n", "/help".cyan(), "/exit".cyan());
}

fn print_status(desk: &Desk, context: &SearchContext) {
    let router = desk.router();
    println!();
    println!("User:      {}", desk.user());
    println!("View:      {}", router.view().colored_tag());
    println!("Chat:      {}", router.selected_chat().unwrap_or("(new)"));
    println!(
        "Workflow:  {}",
        router
            .selected_workflow()
            .and_then(workflows::by_id)
            .map(|w| w.name)
            .unwrap_or("(none)")
    );
    if let Some(id) = router.workflow_chat() {
        println!("Flow chat: {}", id);
    }
    println!("Search:    {}", context.describe());
    if let Some(file) = &context.attachment {
        println!("File:      {}", file.name);
    }
    println!();
}
