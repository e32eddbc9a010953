//! Test utilities for ConsultDesk
//!
//! This module provides common test utilities including temporary
//! directories, ready-made stores and assertion helpers.

use crate::config::Config;
use crate::desk::Desk;
use crate::storage::{SledStore, Storage};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
///
/// # Examples
///
/// ```
/// use consultdesk::test_utils::temp_dir;
///
/// let dir = temp_dir();
/// assert!(dir.path().exists());
/// ```
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Name of the file
/// * `content` - Content to write to the file
///
/// # Returns
///
/// Returns the path to the created file
///
/// # Panics
///
/// Panics if file creation or writing fails
///
/// # Examples
///
/// ```
/// use consultdesk::test_utils::{create_test_file, temp_dir};
///
/// let dir = temp_dir();
/// let path = create_test_file(&dir, "q3.pdf", "totals");
/// assert_eq!(std::fs::read_to_string(path).unwrap(), "totals");
/// ```
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Storage over a sled database inside a fresh temporary directory
///
/// # Returns
///
/// Returns the storage and the directory holding it. Keep the TempDir alive
/// for as long as the storage is used.
///
/// # Panics
///
/// Panics if the database cannot be opened
///
/// # Examples
///
/// ```
/// use consultdesk::test_utils::temp_sled_storage;
///
/// let (storage, _dir) = temp_sled_storage();
/// storage.set_raw("currentUser", "ana@example.com").unwrap();
/// assert!(storage.get_raw("currentUser").unwrap().is_some());
/// ```
pub fn temp_sled_storage() -> (Storage, TempDir) {
    let dir = temp_dir();
    let store = SledStore::open(dir.path().join("store")).expect("Failed to open sled store");
    (Storage::new(store), dir)
}

/// Assert that an error contains the expected message
///
/// # Arguments
///
/// * `result` - Result to check
/// * `expected` - Expected error message substring
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
///
/// # Examples
///
/// ```
/// use consultdesk::error::DeskError;
/// use consultdesk::test_utils::assert_error_contains;
///
/// let result: anyhow::Result<()> = Err(DeskError::Storage("disk full".to_string()).into());
/// assert_error_contains(result, "disk full");
/// ```
pub fn assert_error_contains<T>(result: anyhow::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Default configuration with a short assistant delay
///
/// # Returns
///
/// Returns the default Config with a 10 ms reply delay and a 20 ms badge
/// poll, so async tests finish quickly
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.chat.reply_delay_ms = 10;
    config.reminders.badge_poll_interval_ms = 20;
    config
}

/// In-memory desk with webhooks disabled
///
/// # Panics
///
/// Panics if the desk cannot be built from `test_config()`
///
/// # Examples
///
/// ```
/// use consultdesk::test_utils::test_desk;
///
/// let desk = test_desk();
/// assert_eq!(desk.user(), "guest");
/// ```
pub fn test_desk() -> Desk {
    Desk::new(test_config(), Storage::in_memory())
        .expect("Failed to build desk")
        .with_dispatcher(None)
}

/// Create a test configuration YAML string
///
/// # Returns
///
/// Returns YAML that parses into a valid Config whose webhooks point at a
/// closed local port
pub fn test_config_yaml() -> String {
    r#"
company:
  name: Test Consulting
  greeting_name: Sam

webhooks:
  client: http://127.0.0.1:9/client
  company: http://127.0.0.1:9/company
  financials: http://127.0.0.1:9/financials
  crm: http://127.0.0.1:9/crm
  timeout_seconds: 2

chat:
  max_sessions: 5
  reply_delay_ms: 10

user:
  default_user: tester
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_temp_sled_storage_is_usable() {
        let (storage, _dir) = temp_sled_storage();
        storage.set_raw("k", "v").unwrap();
        assert_eq!(storage.get_raw("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: anyhow::Result<()> =
            Err(DeskError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_validates() {
        let config = test_config();
        assert_eq!(config.chat.reply_delay_ms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let yaml = test_config_yaml();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.company.greeting_name, "Sam");
        assert_eq!(config.chat.max_sessions, 5);
        assert_eq!(config.chat.title_max_chars, 50);
        assert_eq!(config.user.default_user, "tester");
        assert!(config.validate().is_ok());
    }
}
