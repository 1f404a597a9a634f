//! Error types for MythOS Core

use crate::types::Rank;
use thiserror::Error;

/// Main error type for MythOS operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Namespace error: {0}")]
    Namespace(#[from] NamespaceError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Errors that must abort the boot sequence instead of being reported
    /// at the prompt.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Account(AccountError::CorruptStore(_)) => true,
            Error::Access(_) | Error::Config(_) | Error::Json(_) => true,
            _ => false,
        }
    }
}

/// Credential store errors
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account store is unreadable: {0}")]
    CorruptStore(String),

    #[error("That username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("No account at index {0}")]
    IndexOutOfRange(usize),
}

/// Permission model errors. Both variants are configuration mistakes.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("invalid permission status {0}")]
    UnknownMode(String),

    #[error("Invalid permission hierarchy: {rank:?} grants {granted:#05b}, which is not within {parent:#05b}")]
    InvalidHierarchy { rank: Rank, granted: u8, parent: u8 },
}

/// Namespace navigation errors
#[derive(Error, Debug)]
pub enum NamespaceError {
    #[error("not a directory: '{0}'")]
    NotADirectory(String),

    #[error("Path outside namespace: {0}")]
    OutsideRoot(String),

    #[error("cannot read '{name}': {reason}")]
    Unreadable { name: String, reason: String },
}

/// External command errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command asked to return to the prompt early.
    #[error("Command exited early")]
    EarlyExit,

    #[error("Command '{name}' exited with status {code}")]
    Failed { name: String, code: i32 },

    #[error("Failed to start command '{name}': {reason}")]
    Spawn { name: String, reason: String },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Account(AccountError::CorruptStore("bad".into())).is_fatal());
        assert!(Error::Access(AccessError::UnknownMode("EXECUTE".into())).is_fatal());
        assert!(!Error::Namespace(NamespaceError::NotADirectory("x".into())).is_fatal());
        assert!(!Error::Command(CommandError::EarlyExit).is_fatal());
    }

    #[test]
    fn test_not_a_directory_message_quotes_segment() {
        let err = NamespaceError::NotADirectory(String::new());
        assert_eq!(err.to_string(), "not a directory: ''");
    }
}
