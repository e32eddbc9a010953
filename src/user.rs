//! Logged-in user identity
//!
//! The current user is a plain string (an email address) stored under
//! `currentUser`. All per-user data is keyed by it.

use crate::error::{DeskError, Result};
use crate::storage::{Storage, CURRENT_USER_KEY};

/// Reads and writes the `currentUser` key
#[derive(Debug, Clone)]
pub struct UserSession {
    storage: Storage,
}

impl UserSession {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The logged-in user, if any
    pub fn current(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get_raw(CURRENT_USER_KEY)?
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty()))
    }

    /// Log in as `email`, returning the stored identifier
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` if the address is blank or has no `@`
    pub fn login(&self, email: &str) -> Result<String> {
        let email = email.trim();
        if email.is_empty() {
            return Err(DeskError::Validation("Email address is required".to_string()).into());
        }
        if !email.contains('@') {
            return Err(DeskError::Validation(format!(
                "'{}' is not a valid email address",
                email
            ))
            .into());
        }
        self.storage.set_raw(CURRENT_USER_KEY, email)?;
        tracing::info!("Logged in as {}", email);
        Ok(email.to_string())
    }

    /// Log out, returning whether someone was logged in
    pub fn logout(&self) -> Result<bool> {
        let removed = self.storage.remove(CURRENT_USER_KEY)?;
        if removed {
            tracing::info!("Logged out");
        }
        Ok(removed)
    }

    /// The logged-in user or `default_user` when nobody is
    pub fn resolve(&self, default_user: &str) -> Result<String> {
        Ok(self
            .current()?
            .unwrap_or_else(|| default_user.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_user_by_default() {
        let session = UserSession::new(Storage::in_memory());
        assert!(session.current().unwrap().is_none());
        assert_eq!(session.resolve("guest").unwrap(), "guest");
    }

    #[test]
    fn test_login_trims_and_stores_plain_string() {
        let storage = Storage::in_memory();
        let session = UserSession::new(storage.clone());
        assert_eq!(session.login("  ana@example.com ").unwrap(), "ana@example.com");
        assert_eq!(
            storage.get_raw(CURRENT_USER_KEY).unwrap().as_deref(),
            Some("ana@example.com")
        );
        assert_eq!(session.resolve("guest").unwrap(), "ana@example.com");
    }

    #[test]
    fn test_login_rejects_invalid_addresses() {
        let session = UserSession::new(Storage::in_memory());
        assert!(session.login("").is_err());
        assert!(session.login("   ").is_err());
        crate::test_utils::assert_error_contains(session.login("ana"), "not a valid email");
        assert!(session.current().unwrap().is_none());
    }

    #[test]
    fn test_logout() {
        let session = UserSession::new(Storage::in_memory());
        assert!(!session.logout().unwrap());
        session.login("ana@example.com").unwrap();
        assert!(session.logout().unwrap());
        assert!(session.current().unwrap().is_none());
    }

    #[test]
    fn test_blank_stored_value_is_no_user() {
        let storage = Storage::in_memory();
        storage.set_raw(CURRENT_USER_KEY, "  ").unwrap();
        assert!(UserSession::new(storage).current().unwrap().is_none());
    }
}
