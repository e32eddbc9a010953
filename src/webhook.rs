//! Search webhook dispatcher
//!
//! When a chat message is sent with a search type selected, the desk posts a
//! small JSON notification to the endpoint configured for that type. The
//! notification is best effort:
//! - the HTTP status and body are never inspected
//! - transport failures are logged and reported as [`DispatchOutcome::Failed`]
//! - nothing is retried
//!
//! Callers that do not care about the outcome use
//! [`WebhookDispatcher::notify`] and drop the returned handle.

use crate::config::WebhookConfig;
use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Search category selected in the chat prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// "my client"
    Client,
    /// "my company"
    Company,
    /// "my financials"
    Financials,
    /// "my crm"
    Crm,
}

impl SearchType {
    /// Every search type, in menu order
    pub const ALL: [SearchType; 4] = [
        SearchType::Client,
        SearchType::Company,
        SearchType::Financials,
        SearchType::Crm,
    ];

    /// Wire name of the search type
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Client => "client",
            SearchType::Company => "company",
            SearchType::Financials => "financials",
            SearchType::Crm => "crm",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = DeskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(SearchType::Client),
            "company" => Ok(SearchType::Company),
            "financials" => Ok(SearchType::Financials),
            "crm" => Ok(SearchType::Crm),
            other => Err(DeskError::Validation(format!(
                "Unknown search type '{}'. Must be one of: client, company, financials, crm",
                other
            ))),
        }
    }
}

/// Metadata of a file the user picked to "upload"
///
/// Only the metadata travels with the webhook; the content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// File name without directories
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type guessed from the extension
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl FileAttachment {
    /// Build attachment metadata from a file on disk
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Io` if the file metadata cannot be read, or
    /// `DeskError::Validation` if the path is not a regular file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(DeskError::from)?;
        if !metadata.is_file() {
            return Err(DeskError::Validation(format!("{} is not a file", path.display())).into());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            mime_type: guess_mime_type(&name).to_string(),
            name,
            size: metadata.len(),
        })
    }
}

fn guess_mime_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// A search notification to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    /// Selects the endpoint
    pub search_type: SearchType,
    /// Client the search is about, if any
    pub client_name: Option<String>,
    /// The user's message text
    pub query: String,
    /// Sending user
    pub user_id: String,
    /// Optional attached file metadata
    pub file: Option<FileAttachment>,
}

/// JSON body posted to the endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub search_type: SearchType,
    pub client_name: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file: Option<FileAttachment>,
}

impl WebhookPayload {
    /// Build the body for a request, stamped with the current time
    pub fn from_request(request: &WebhookRequest) -> Self {
        Self {
            search_type: request.search_type,
            client_name: request.client_name.clone().unwrap_or_default(),
            query: request.query.clone(),
            timestamp: Utc::now(),
            user_id: request.user_id.clone(),
            file: request.file.clone(),
        }
    }
}

/// What happened to a webhook POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request completed; delivery is assumed
    Sent,
    /// The request never completed
    Failed {
        /// Transport error description
        reason: String,
    },
}

impl DispatchOutcome {
    /// Whether the request was handed off
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

/// Posts search notifications to the configured endpoints
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    endpoints: WebhookConfig,
}

impl WebhookDispatcher {
    /// Create a dispatcher for the configured endpoint table
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Webhook` if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use consultdesk::config::WebhookConfig;
    /// use consultdesk::webhook::{SearchType, WebhookDispatcher};
    ///
    /// let dispatcher = WebhookDispatcher::new(&WebhookConfig::default()).unwrap();
    /// assert!(dispatcher.endpoint(SearchType::Crm).ends_with("crm-search"));
    /// ```
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("consultdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeskError::Webhook(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints: config.clone(),
        })
    }

    /// Endpoint URL for a search type
    pub fn endpoint(&self, search_type: SearchType) -> &str {
        self.endpoints.endpoint(search_type)
    }

    /// POST the notification and report whether it was handed off
    ///
    /// Never returns an error: a completed request is `Sent` whatever the
    /// response status, and transport failures become `Failed`.
    pub async fn send(&self, request: &WebhookRequest) -> DispatchOutcome {
        let url = self.endpoint(request.search_type);
        let payload = WebhookPayload::from_request(request);

        tracing::debug!(
            "Posting {} search webhook to {} for user {}",
            request.search_type,
            url,
            request.user_id
        );

        match self.client.post(url).json(&payload).send().await {
            Ok(response) => {
                tracing::debug!(
                    "{} webhook completed with status {}",
                    request.search_type,
                    response.status()
                );
                DispatchOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("{} webhook to {} failed: {}", request.search_type, url, e);
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Send in a detached task
    ///
    /// The handle may be dropped; the request still runs to completion.
    /// Must be called from within a tokio runtime.
    pub fn notify(
        self: &Arc<Self>,
        request: WebhookRequest,
    ) -> tokio::task::JoinHandle<DispatchOutcome> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.send(&request).await })
    }
}
