//! Core type definitions for MythOS
//!
//! Shared data model: accounts and their on-disk layout, access modes and
//! permissions, and namespace entries.

mod access_types;
mod account_types;
mod namespace_types;

pub use access_types::*;
pub use account_types::*;
pub use namespace_types::*;
