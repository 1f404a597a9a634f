//! Namespace backed by a host directory

use super::Namespace;
use crate::error::{Error, NamespaceError, Result};
use crate::types::{sort_entries, Entry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Serves the tree under `root` without ever writing to it
#[derive(Debug, Clone)]
pub struct FsNamespace {
    root: PathBuf,
}

impl FsNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map namespace segments to a host path. Segments that could step
    /// outside the root are refused.
    fn resolve(&self, path: &[String]) -> Result<PathBuf> {
        let mut host = self.root.clone();
        for segment in path {
            let escapes = segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\', '\0']);
            if escapes {
                return Err(Error::Namespace(NamespaceError::OutsideRoot(segment.clone())));
            }
            host.push(segment);
        }
        Ok(host)
    }
}

#[async_trait]
impl Namespace for FsNamespace {
    async fn is_dir(&self, path: &[String]) -> Result<bool> {
        let host = match self.resolve(path) {
            Ok(host) => host,
            Err(_) => return Ok(false),
        };
        Ok(fs::metadata(&host).await.map(|m| m.is_dir()).unwrap_or(false))
    }

    async fn list(&self, path: &[String]) -> Result<Vec<Entry>> {
        let host = self.resolve(path)?;
        let display = path.last().cloned().unwrap_or_else(|| super::ROOT.to_string());

        let is_dir = fs::metadata(&host).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(Error::Namespace(NamespaceError::NotADirectory(display)));
        }

        debug!("Listing namespace directory: {:?}", host);

        let unreadable = |e: std::io::Error| {
            Error::Namespace(NamespaceError::Unreadable {
                name: display.clone(),
                reason: e.to_string(),
            })
        };

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&host).await.map_err(unreadable)?;
        while let Some(entry) = read_dir.next_entry().await.map_err(unreadable)? {
            // Follows symlinks, like `is_dir`
            let is_dir = fs::metadata(entry.path()).await.map(|m| m.is_dir()).unwrap_or(false);
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir,
            });
        }
        sort_entries(&mut entries);

        Ok(entries)
    }

    fn host_path(&self, path: &[String]) -> Option<PathBuf> {
        self.resolve(path).ok()
    }
}
