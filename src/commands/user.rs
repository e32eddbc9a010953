//! `user` subcommand: show, login, logout and list users

use crate::cli::UserCommand;
use crate::desk::Desk;
use crate::error::Result;
use colored::Colorize;

/// Handle user commands
pub fn handle_user(desk: &mut Desk, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Show => match desk.session().current()? {
            Some(user) => println!("Logged in as {}", user.cyan()),
            None => println!(
                "Not logged in (using {})",
                desk.config().user.default_user.cyan()
            ),
        },
        UserCommand::Login { email } => {
            desk.login(&email)?;
            println!("{}", format!("Logged in as {}", desk.user()).green());
        }
        UserCommand::Logout => {
            desk.logout()?;
            println!("{}", "Logged out".green());
        }
        UserCommand::List => {
            let users = desk.storage().known_users()?;
            if users.is_empty() {
                println!("{}", "No stored users.".yellow());
            }
            for user in users {
                if user == desk.user() {
                    println!("* {}", user.cyan());
                } else {
                    println!("  {}", user);
                }
            }
        }
    }

    Ok(())
}
