//! `settings` subcommand: list, get, set and reset per-user settings

use crate::cli::SettingsCommand;
use crate::desk::Desk;
use crate::error::{DeskError, Result};
use crate::settings::SettingValue;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle settings commands
pub fn handle_settings(desk: &mut Desk, command: SettingsCommand) -> Result<()> {
    let store = desk.settings();

    match command {
        SettingsCommand::List => {
            let settings = store.load()?;
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row!["Setting".bold(), "Value".bold()]);
            for (name, value) in settings.iter() {
                table.add_row(prettytable::row![name.cyan(), value]);
            }
            println!("\nSettings:");
            table.printstd();
            println!();
        }
        SettingsCommand::Get { name } => {
            let value = store
                .get(&name)?
                .ok_or_else(|| DeskError::NotFound(format!("setting {}", name)))?;
            println!("{}", value);
        }
        SettingsCommand::Set { name, value } => {
            let value = SettingValue::parse(&value);
            store.set(&name, value.clone())?;
            println!("{}", format!("Set {} = {}", name.trim(), value).green());
        }
        SettingsCommand::Reset => {
            store.reset()?;
            println!("{}", "Settings restored to defaults".green());
        }
    }

    Ok(())
}
