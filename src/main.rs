//! ConsultDesk - consulting assistant desk
//!
#![doc = "ConsultDesk - consulting assistant desk"]
#![doc = "Main entry point for the ConsultDesk CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use consultdesk::cli::{Cli, Commands};
use consultdesk::commands;
use consultdesk::config::Config;
use consultdesk::desk::Desk;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let mut desk = Desk::open(config)?;

    // Execute command
    match cli.command {
        Commands::Chat {
            resume,
            workflow,
            command,
        } => match command {
            Some(command) => {
                tracing::info!("Sending one-shot chat message");
                commands::chat::send_once(&mut desk, command).await
            }
            None => {
                tracing::info!("Starting interactive chat mode");
                if let Some(r) = &resume {
                    tracing::debug!("Resuming chat: {}", r);
                }
                commands::chat::run_chat(&mut desk, resume, workflow).await
            }
        },
        Commands::History { command } => commands::history::handle_history(&mut desk, command),
        Commands::Reminders { command } => {
            commands::reminders::handle_reminders(&mut desk, command)
        }
        Commands::Workflows { command } => {
            commands::workflows::handle_workflows(&mut desk, command).await
        }
        Commands::Settings { command } => commands::settings::handle_settings(&mut desk, command),
        Commands::User { command } => commands::user::handle_user(&mut desk, command),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output (including `--json`) stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "consultdesk=debug"
    } else {
        "consultdesk=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
