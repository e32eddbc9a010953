//! Application settings
//!
//! Settings are a flat map of name to bool, number or string stored as one
//! JSON object under `appSettings`. Stored values overlay the built-in
//! defaults; names the desk does not know about are kept as-is.

use crate::error::{DeskError, Result};
use crate::storage::{Storage, APP_SETTINGS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl SettingValue {
    /// Interpret command-line text
    ///
    /// `true`/`false` become booleans, anything numeric becomes a number,
    /// everything else is kept as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use consultdesk::settings::SettingValue;
    ///
    /// assert_eq!(SettingValue::parse("true"), SettingValue::Bool(true));
    /// assert_eq!(SettingValue::parse("30").to_string(), "30");
    /// assert_eq!(SettingValue::parse("large"), SettingValue::Text("large".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Number(n.into());
        }
        if let Some(n) = trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Self::Number(n);
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Effective settings: defaults overlaid with stored values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSettings(BTreeMap<String, SettingValue>);

impl Default for AppSettings {
    fn default() -> Self {
        let defaults: [(&str, SettingValue); 9] = [
            ("notifications", true.into()),
            ("darkMode", false.into()),
            ("language", "en".into()),
            ("autoSave", true.into()),
            ("fontSize", "medium".into()),
            ("soundEnabled", false.into()),
            ("defaultWorkflow", "".into()),
            ("maxHistoryItems", 50i64.into()),
            ("sessionTimeout", 30i64.into()),
        ];
        Self(
            defaults
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

impl AppSettings {
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SettingValue) {
        self.0.insert(name.into(), value);
    }

    /// Settings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reads and writes the `appSettings` blob
#[derive(Debug, Clone)]
pub struct SettingsStore {
    storage: Storage,
}

impl SettingsStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Current settings
    ///
    /// A missing or malformed blob yields the defaults.
    pub fn load(&self) -> Result<AppSettings> {
        let mut settings = AppSettings::default();
        let stored: Option<BTreeMap<String, SettingValue>> =
            self.storage.load_json(APP_SETTINGS_KEY)?;
        for (name, value) in stored.unwrap_or_default() {
            settings.insert(name, value);
        }
        Ok(settings)
    }

    /// Value of a single setting
    pub fn get(&self, name: &str) -> Result<Option<SettingValue>> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Change one setting and persist the whole map
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` for a blank name
    pub fn set(&self, name: &str, value: SettingValue) -> Result<AppSettings> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::Validation("Setting name is required".to_string()).into());
        }
        let mut settings = self.load()?;
        settings.insert(name, value);
        self.storage.save_json(APP_SETTINGS_KEY, &settings)?;
        tracing::debug!("Updated setting {}", name);
        Ok(settings)
    }

    /// Forget stored values, returning whether anything was stored
    pub fn reset(&self) -> Result<bool> {
        self.storage.remove(APP_SETTINGS_KEY)
    }
}
