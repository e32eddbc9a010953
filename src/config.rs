//! Configuration management for ConsultDesk
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DeskError, Result};
use crate::webhook::SearchType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for ConsultDesk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Company branding and search vocabulary
    #[serde(default)]
    pub company: CompanyConfig,
    /// Search webhook endpoints
    #[serde(default)]
    pub webhooks: WebhookConfig,
    /// Chat history and assistant reply behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// Reminder badge behavior
    #[serde(default)]
    pub reminders: RemindersConfig,
    /// Storage backend location
    #[serde(default)]
    pub storage: StorageConfig,
    /// User identity defaults
    #[serde(default)]
    pub user: UserConfig,
}

/// A selectable value with a human label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledOption {
    /// Machine value
    pub value: String,
    /// Display label
    pub label: String,
}

impl LabeledOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Company branding and search vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// Company display name
    #[serde(default = "default_company_name")]
    pub name: String,

    /// Name used in the greeting banner
    #[serde(default = "default_greeting_name")]
    pub greeting_name: String,

    /// Search types offered in the chat prompt
    #[serde(default = "default_search_options")]
    pub search_options: Vec<LabeledOption>,

    /// Clients offered when searching "my client"
    #[serde(default = "default_clients")]
    pub clients: Vec<LabeledOption>,
}

fn default_company_name() -> String {
    "Capital Consult".to_string()
}

fn default_greeting_name() -> String {
    "Tony".to_string()
}

fn default_search_options() -> Vec<LabeledOption> {
    vec![
        LabeledOption::new("client", "my client"),
        LabeledOption::new("company", "my company"),
        LabeledOption::new("financials", "my financials"),
        LabeledOption::new("crm", "my crm"),
    ]
}

fn default_clients() -> Vec<LabeledOption> {
    vec![
        LabeledOption::new("acme-corp", "Acme Corporation"),
        LabeledOption::new("tech-solutions", "Tech Solutions Ltd"),
        LabeledOption::new("global-industries", "Global Industries"),
        LabeledOption::new("startup-inc", "Startup Inc"),
    ]
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            greeting_name: default_greeting_name(),
            search_options: default_search_options(),
            clients: default_clients(),
        }
    }
}

impl CompanyConfig {
    /// Display label for a client value, falling back to the value itself
    pub fn client_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.clients
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
            .unwrap_or(value)
    }

    /// Display label for a search type, e.g. `my crm`
    pub fn search_label(&self, search_type: SearchType) -> &str {
        self.search_options
            .iter()
            .find(|o| o.value == search_type.as_str())
            .map(|o| o.label.as_str())
            .unwrap_or(search_type.as_str())
    }
}

/// Search webhook endpoints, one per search type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint for client searches
    #[serde(default = "default_client_webhook")]
    pub client: String,

    /// Endpoint for company searches
    #[serde(default = "default_company_webhook")]
    pub company: String,

    /// Endpoint for financial searches
    #[serde(default = "default_financials_webhook")]
    pub financials: String,

    /// Endpoint for CRM searches
    #[serde(default = "default_crm_webhook")]
    pub crm: String,

    /// Request timeout for a single webhook POST (seconds)
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
}

fn default_client_webhook() -> String {
    "https://api.example.com/webhooks/client-search".to_string()
}

fn default_company_webhook() -> String {
    "https://api.example.com/webhooks/company-search".to_string()
}

fn default_financials_webhook() -> String {
    "https://api.example.com/webhooks/financial-search".to_string()
}

fn default_crm_webhook() -> String {
    "https://api.example.com/webhooks/crm-search".to_string()
}

fn default_webhook_timeout() -> u64 {
    10
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            client: default_client_webhook(),
            company: default_company_webhook(),
            financials: default_financials_webhook(),
            crm: default_crm_webhook(),
            timeout_seconds: default_webhook_timeout(),
        }
    }
}

impl WebhookConfig {
    /// Endpoint URL configured for a search type
    pub fn endpoint(&self, search_type: SearchType) -> &str {
        match search_type {
            SearchType::Client => &self.client,
            SearchType::Company => &self.company,
            SearchType::Financials => &self.financials,
            SearchType::Crm => &self.crm,
        }
    }

    fn endpoint_mut(&mut self, search_type: SearchType) -> &mut String {
        match search_type {
            SearchType::Client => &mut self.client,
            SearchType::Company => &mut self.company,
            SearchType::Financials => &mut self.financials,
            SearchType::Crm => &mut self.crm,
        }
    }
}

/// Chat history and assistant reply behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum chat sessions retained per user
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Maximum characters of the first message used as a session title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Delay before the assistant reply is appended (milliseconds)
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Canned assistant reply text
    #[serde(default = "default_assistant_reply")]
    pub assistant_reply: String,
}

fn default_max_sessions() -> usize {
    50
}

fn default_title_max_chars() -> usize {
    50
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_assistant_reply() -> String {
    "Thank you for your message. I'm here to assist you with your consulting needs.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            title_max_chars: default_title_max_chars(),
            reply_delay_ms: default_reply_delay_ms(),
            assistant_reply: default_assistant_reply(),
        }
    }
}

/// Reminder badge behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Fallback poll interval for the reminder count badge (milliseconds)
    #[serde(default = "default_badge_poll_interval")]
    pub badge_poll_interval_ms: u64,
}

fn default_badge_poll_interval() -> u64 {
    1000
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            badge_poll_interval_ms: default_badge_poll_interval(),
        }
    }
}

/// Storage backend location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory of the on-disk store; the user data directory when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// User identity defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// User id used when nobody is logged in
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_user() -> String {
    "guest".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DeskError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(user) = std::env::var("CONSULTDESK_USER") {
            self.user.default_user = user;
        }

        if let Ok(store) = std::env::var("CONSULTDESK_STORE") {
            self.storage.path = Some(store);
        }

        if let Ok(timeout) = std::env::var("CONSULTDESK_WEBHOOK_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.webhooks.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CONSULTDESK_WEBHOOK_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(delay) = std::env::var("CONSULTDESK_REPLY_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.chat.reply_delay_ms = value;
            } else {
                tracing::warn!("Invalid CONSULTDESK_REPLY_DELAY_MS: {}", delay);
            }
        }

        for search_type in SearchType::ALL {
            let var = format!(
                "CONSULTDESK_WEBHOOK_{}",
                search_type.as_str().to_uppercase()
            );
            if let Ok(url) = std::env::var(&var) {
                tracing::debug!("Overriding {} webhook from {}", search_type, var);
                *self.webhooks.endpoint_mut(search_type) = url;
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(store) = &cli.store {
            self.storage.path = Some(store.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        for search_type in SearchType::ALL {
            let endpoint = self.webhooks.endpoint(search_type);
            let parsed = url::Url::parse(endpoint).map_err(|e| {
                DeskError::Config(format!(
                    "Invalid {} webhook URL '{}': {}",
                    search_type, endpoint, e
                ))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(DeskError::Config(format!(
                    "{} webhook must use http or https, got {}",
                    search_type,
                    parsed.scheme()
                ))
                .into());
            }
        }

        if self.webhooks.timeout_seconds == 0 {
            return Err(DeskError::Config(
                "webhooks.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.max_sessions == 0 {
            return Err(
                DeskError::Config("chat.max_sessions must be greater than 0".to_string()).into(),
            );
        }

        if self.chat.max_sessions > 1000 {
            return Err(DeskError::Config(
                "chat.max_sessions must be less than or equal to 1000".to_string(),
            )
            .into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(DeskError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.reminders.badge_poll_interval_ms == 0 {
            return Err(DeskError::Config(
                "reminders.badge_poll_interval_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.user.default_user.trim().is_empty() {
            return Err(
                DeskError::Config("user.default_user cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
