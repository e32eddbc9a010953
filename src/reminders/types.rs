//! Reminder records and the draft used to create them
//!
//! Dates are stored as `YYYY-MM-DD` and times as `HH:MM`; drafts are
//! validated before anything reaches storage.

use crate::error::{DeskError, Result};
use crate::webhook::SearchType;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How pressing a reminder is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = DeskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(DeskError::Validation(format!(
                "Unknown priority '{}'. Must be one of: low, medium, high, urgent",
                other
            ))),
        }
    }
}

/// How often a reminder comes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatInterval {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RepeatInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatInterval::None => "none",
            RepeatInterval::Daily => "daily",
            RepeatInterval::Weekly => "weekly",
            RepeatInterval::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

impl FromStr for RepeatInterval {
    type Err = DeskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RepeatInterval::None),
            "daily" => Ok(RepeatInterval::Daily),
            "weekly" => Ok(RepeatInterval::Weekly),
            "monthly" => Ok(RepeatInterval::Monthly),
            other => Err(DeskError::Validation(format!(
                "Unknown repeat interval '{}'. Must be one of: none, daily, weekly, monthly",
                other
            ))),
        }
    }
}

/// Lifecycle state of a reminder; only `active` exists today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Active,
}

/// Snapshot of the chat query a reminder was created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedQuery {
    pub search_type: SearchType,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub custom_query: String,
    pub timestamp: DateTime<Utc>,
    pub cached_result: String,
}

impl CachedQuery {
    fn capture(search_type: SearchType, client_name: &str, custom_query: &str) -> Self {
        let query = if custom_query.trim().is_empty() {
            "Default query"
        } else {
            custom_query
        };
        Self {
            search_type,
            client_name: client_name.to_string(),
            custom_query: custom_query.to_string(),
            timestamp: Utc::now(),
            cached_result: format!("Cached result for {} query: {}", search_type, query),
        }
    }
}

/// A stored reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_query: Option<CachedQuery>,
    #[serde(default)]
    pub repeat_interval: RepeatInterval,
    #[serde(default = "default_notification_methods")]
    pub notification_methods: Vec<String>,
    #[serde(default)]
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}

fn default_notification_methods() -> Vec<String> {
    vec!["popup".to_string()]
}

impl Reminder {
    /// Date and time combined for display, e.g. `2025-01-01 09:00`
    pub fn scheduled_for(&self) -> String {
        format!("{} {}", self.date, self.time).trim().to_string()
    }
}

/// Form input for a new reminder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReminderDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub priority: Priority,
    pub search_type: Option<SearchType>,
    pub client_name: Option<String>,
    pub custom_query: Option<String>,
    pub repeat_interval: RepeatInterval,
    /// Empty means the default (`popup`)
    pub notification_methods: Vec<String>,
}

impl ReminderDraft {
    /// Draft with the required fields set and everything else defaulted
    ///
    /// # Examples
    ///
    /// ```
    /// use consultdesk::reminders::{Priority, ReminderDraft};
    ///
    /// let draft = ReminderDraft::new("Call Acme", "2025-01-01", "09:00")
    ///     .with_priority(Priority::High);
    /// assert!(draft.validate().is_ok());
    /// ```
    pub fn new(title: &str, date: &str, time: &str) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            ..Self::default()
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Attach the chat query this reminder should re-run
    pub fn with_query(
        mut self,
        search_type: SearchType,
        client_name: Option<String>,
        custom_query: Option<String>,
    ) -> Self {
        self.search_type = Some(search_type);
        self.client_name = client_name;
        self.custom_query = custom_query;
        self
    }

    /// Check the required fields
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` for a blank title, a date that is not
    /// `YYYY-MM-DD` or a time that is not `HH:MM`
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DeskError::Validation("Reminder title is required".to_string()).into());
        }
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            DeskError::Validation(format!(
                "Invalid reminder date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })?;
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").map_err(|_| {
            DeskError::Validation(format!(
                "Invalid reminder time '{}', expected HH:MM",
                self.time
            ))
        })?;
        Ok(())
    }

    pub(crate) fn into_reminder(self, id: String) -> Reminder {
        let cached_query = self.search_type.map(|search_type| {
            CachedQuery::capture(
                search_type,
                self.client_name.as_deref().unwrap_or_default(),
                self.custom_query.as_deref().unwrap_or_default(),
            )
        });
        let notification_methods = if self.notification_methods.is_empty() {
            default_notification_methods()
        } else {
            self.notification_methods
        };

        Reminder {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            priority: self.priority,
            search_type: self.search_type,
            client_name: self.client_name,
            custom_query: self.custom_query,
            cached_query,
            repeat_interval: self.repeat_interval,
            notification_methods,
            status: ReminderStatus::Active,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(Priority::High.to_string(), "high");
        assert!("critical".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Low < Priority::Medium);
    }

    #[test]
    fn test_repeat_interval_parse() {
        assert_eq!(
            "weekly".parse::<RepeatInterval>().unwrap(),
            RepeatInterval::Weekly
        );
        assert!("hourly".parse::<RepeatInterval>().is_err());
    }

    #[test]
    fn test_validate_requires_title() {
        let draft = ReminderDraft::new("   ", "2025-01-01", "09:00");
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_date_and_time() {
        assert!(ReminderDraft::new("x", "01/01/2025", "09:00")
            .validate()
            .is_err());
        assert!(ReminderDraft::new("x", "2025-02-30", "09:00")
            .validate()
            .is_err());
        assert!(ReminderDraft::new("x", "2025-01-01", "9am")
            .validate()
            .is_err());
        assert!(ReminderDraft::new("x", "2025-01-01", "25:00")
            .validate()
            .is_err());
    }

    #[test]
    fn test_into_reminder_defaults() {
        let reminder = ReminderDraft::new(" Call Acme ", "2025-01-01", "09:00")
            .into_reminder("01TEST".to_string());
        assert_eq!(reminder.title, "Call Acme");
        assert_eq!(reminder.status, ReminderStatus::Active);
        assert_eq!(reminder.notification_methods, vec!["popup"]);
        assert_eq!(reminder.repeat_interval, RepeatInterval::None);
        assert!(reminder.cached_query.is_none());
        assert_eq!(reminder.scheduled_for(), "2025-01-01 09:00");
    }

    #[test]
    fn test_into_reminder_captures_query() {
        let reminder = ReminderDraft::new("Check books", "2025-01-01", "09:00")
            .with_query(SearchType::Financials, None, None)
            .into_reminder("01TEST".to_string());
        let cached = reminder.cached_query.expect("cached query");
        assert_eq!(
            cached.cached_result,
            "Cached result for financials query: Default query"
        );

        let reminder = ReminderDraft::new("Check client", "2025-01-01", "09:00")
            .with_query(
                SearchType::Client,
                Some("acme-corp".to_string()),
                Some("open invoices".to_string()),
            )
            .into_reminder("01TEST".to_string());
        let cached = reminder.cached_query.expect("cached query");
        assert_eq!(cached.client_name, "acme-corp");
        assert_eq!(
            cached.cached_result,
            "Cached result for client query: open invoices"
        );
    }

    #[test]
    fn test_reminder_serializes_camel_case() {
        let reminder = ReminderDraft::new("Call", "2025-01-01", "09:00")
            .with_priority(Priority::Urgent)
            .into_reminder("01TEST".to_string());
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["priority"], "urgent");
        assert_eq!(value["status"], "active");
        assert_eq!(value["repeatInterval"], "none");
        assert!(value["createdAt"].is_string());
        assert!(value.get("searchType").is_none());
    }
}
