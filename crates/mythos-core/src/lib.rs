//! MythOS Core Library
//!
//! This crate provides the core of the MythOS shell, including:
//! - Credential store with account picker, login and account creation
//! - Rank-based access control over resources
//! - Line editor and the terminal display adapter trait
//! - Namespace navigation over a directory tree
//! - The interactive shell loop
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       mythos-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  account/      - Store, policies, picker, login, create     │
//! │  access/       - Permission checks and resource opening     │
//! │  input/        - Terminal trait, line editor, header bar    │
//! │  namespace/    - Namespace backend and navigator            │
//! │  shell/        - Shell loop, builtins, external commands    │
//! │  session.rs    - Boot-time session establishment            │
//! │  config.rs     - mythos.json configuration                  │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod access;
pub mod account;
pub mod config;
pub mod error;
pub mod input;
pub mod namespace;
pub mod session;
pub mod shell;
pub mod testing;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use access::{AccessController, OpenOutcome};
pub use account::{AccountStore, PasswordPolicy, PickerEntry};
pub use config::ShellConfig;
pub use input::{Key, LineEditor, ReadOutcome, Terminal};
pub use namespace::{FsNamespace, Namespace, Navigator};
pub use session::{establish_session, Session};
pub use shell::{ShellLoop, ShellState};
