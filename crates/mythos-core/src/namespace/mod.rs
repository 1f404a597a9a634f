//! Read-only hierarchical namespace and the current-directory stack
//!
//! This module provides:
//! - The `Namespace` trait the shell uses for directory existence and
//!   listing
//! - `FsNamespace`, a namespace backed by a host directory
//! - `Navigator`, the directory stack behind the prompt, `cd` and `ls`

mod filesystem;
mod navigator;

pub use filesystem::FsNamespace;
pub use navigator::Navigator;

use crate::error::Result;
use crate::types::Entry;
use async_trait::async_trait;
use std::path::PathBuf;

/// Sentinel first segment of every path
pub const ROOT: &str = "root";

pub const SEPARATOR: char = '/';

/// A read-only directory tree. Paths are the segments below the root.
#[async_trait]
pub trait Namespace: Send + Sync {
    /// True when `path` names an existing directory
    async fn is_dir(&self, path: &[String]) -> Result<bool>;

    /// Immediate children of the directory at `path`
    async fn list(&self, path: &[String]) -> Result<Vec<Entry>>;

    /// Host directory backing `path`, if the namespace has one
    fn host_path(&self, _path: &[String]) -> Option<PathBuf> {
        None
    }
}
