//! `reminders` subcommand: add, list and delete reminders

use crate::cli::ReminderCommand;
use crate::desk::Desk;
use crate::error::Result;
use crate::reminders::{Priority, Reminder, ReminderDraft, RepeatInterval};
use crate::webhook::SearchType;
use colored::Colorize;
use prettytable::{format, Table};

use super::print_json;

/// Handle reminder commands
pub fn handle_reminders(desk: &mut Desk, command: ReminderCommand) -> Result<()> {
    let store = desk.reminder_store();

    match command {
        ReminderCommand::List { json } => {
            let reminders = store.list()?;
            if json {
                return print_json(&reminders);
            }
            print_reminders(&reminders);
        }
        ReminderCommand::Add {
            title,
            date,
            time,
            priority,
            description,
            search_type,
            client,
            query,
            repeat,
        } => {
            let mut draft = ReminderDraft::new(&title, &date, &time)
                .with_priority(priority.parse::<Priority>()?)
                .with_description(&description);
            draft.repeat_interval = repeat.parse::<RepeatInterval>()?;
            if let Some(search_type) = search_type {
                draft = draft.with_query(search_type.parse::<SearchType>()?, client, query);
            }

            let reminder = store.add(draft)?;
            println!(
                "{}",
                format!(
                    "Added reminder {} for {}",
                    reminder.id,
                    reminder.scheduled_for()
                )
                .green()
            );
        }
        ReminderCommand::Delete { id } => {
            if store.delete(&id)? {
                println!("{}", format!("Deleted reminder {}", id).green());
            } else {
                println!("{}", format!("No reminder with ID {}", id).yellow());
            }
        }
    }

    Ok(())
}

/// Print reminders as a table
pub(crate) fn print_reminders(reminders: &[Reminder]) {
    if reminders.is_empty() {
        println!("{}", "No reminders set.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "When".bold(),
        "Priority".bold(),
        "Title".bold(),
        "Repeat".bold(),
        "Query".bold()
    ]);

    for reminder in reminders {
        let query = reminder
            .search_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(prettytable::row![
            reminder.id.cyan(),
            reminder.scheduled_for(),
            colored_priority(reminder.priority),
            reminder.title,
            reminder.repeat_interval,
            query
        ]);
    }

    println!("\nReminders ({}):", reminders.len());
    table.printstd();
    println!();
}

fn colored_priority(priority: Priority) -> colored::ColoredString {
    let label = priority.to_string();
    match priority {
        Priority::Low => label.dimmed(),
        Priority::Medium => label.normal(),
        Priority::High => label.yellow(),
        Priority::Urgent => label.red().bold(),
    }
}
