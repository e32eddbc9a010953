//! `workflows` subcommand: browse workflows and run them with inputs

use crate::cli::WorkflowCommand;
use crate::desk::{ChatInput, Desk};
use crate::error::{DeskError, Result};
use crate::workflows::{self, FieldKind, WorkflowDefinition};
use colored::Colorize;
use prettytable::{format, Table};
use std::collections::BTreeMap;

/// Handle workflow commands
pub async fn handle_workflows(desk: &mut Desk, command: WorkflowCommand) -> Result<()> {
    match command {
        WorkflowCommand::List { search } => {
            let found = workflows::search(search.as_deref().unwrap_or_default());
            print_workflows(&found);
        }
        WorkflowCommand::Show { id } => {
            print_workflow(lookup(&id)?);
        }
        WorkflowCommand::Run {
            id,
            inputs,
            message,
        } => {
            let workflow = lookup(&id)?;
            let values = parse_inputs(&inputs)?;
            workflow.validate_inputs(&values)?;
            println!("{}", format!("All {} inputs are valid", workflow.name).green());

            if let Some(message) = message {
                desk.select_workflow(workflow.id);
                let sent = desk.send_workflow_message(ChatInput::new(message))?;
                if sent.is_some() {
                    if let Some(reply) = desk.await_reply().await {
                        println!("{} {}", "Assistant:".green().bold(), reply.content);
                    }
                }
            }
        }
    }

    Ok(())
}

fn lookup(id: &str) -> Result<&'static WorkflowDefinition> {
    workflows::by_id(id).ok_or_else(|| DeskError::NotFound(format!("workflow {}", id)).into())
}

/// Turn `name=value` pairs into a form map
///
/// # Errors
///
/// Returns `DeskError::Validation` for a pair without `=` or with an empty
/// name
pub(crate) fn parse_inputs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(DeskError::Validation(format!(
                "Invalid input '{}', expected NAME=VALUE",
                pair
            ))
            .into()),
        })
        .collect()
}

fn print_workflows(found: &[&WorkflowDefinition]) {
    if found.is_empty() {
        println!("{}", "No workflows found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Description".bold()
    ]);
    for workflow in found {
        table.add_row(prettytable::row![
            workflow.id.cyan(),
            workflow.name,
            workflow.description
        ]);
    }

    println!("\nWorkflows:");
    table.printstd();
    println!();
}

fn print_workflow(workflow: &WorkflowDefinition) {
    println!("\n{} ({})", workflow.name.bold(), workflow.id.cyan());
    println!("{}\n", workflow.description);

    for field in workflow.fields {
        match field.kind {
            FieldKind::Text => println!("  {} [{}]: free text", field.label, field.name),
            FieldKind::Select => {
                let options: Vec<String> = field
                    .options
                    .iter()
                    .map(|o| format!("{} ({})", o.value, o.label))
                    .collect();
                println!(
                    "  {} [{}]: one of {}",
                    field.label,
                    field.name,
                    options.join(", ")
                );
            }
        }
    }
    println!();
}
