//! Username and password rules

use crate::types::Account;

/// Reason `username` cannot be registered, if any
pub fn check_username(existing: &[Account], username: &str) -> Option<String> {
    if username.trim().is_empty() {
        return Some("Username cannot be empty".to_string());
    }
    if existing.iter().any(|a| a.username == username) {
        return Some("That username already exists".to_string());
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// The first rule `password` breaks, if any
    pub fn check(&self, password: &str) -> Option<String> {
        if password.chars().count() < self.min_length {
            return Some(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if password.chars().all(char::is_alphanumeric) {
            return Some("Password must contain at least one symbol".to_string());
        }
        None
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(8)
    }
}
