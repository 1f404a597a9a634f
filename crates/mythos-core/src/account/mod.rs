//! Credential store and account flows
//!
//! This module provides:
//! - `AccountStore`, the persisted account registry
//! - Username and password policies
//! - The account picker, login and account-creation flows

mod flow;
mod picker;
mod policy;
mod store;

pub use flow::{create_account, login, CreateOutcome, LoginOutcome};
pub use picker::{pick_account, Picker, PickerEntry};
pub use policy::{check_username, PasswordPolicy};
pub use store::AccountStore;
