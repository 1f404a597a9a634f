//! Current-directory stack

use super::{Namespace, ROOT, SEPARATOR};
use crate::error::{Error, NamespaceError, Result};
use crate::types::Entry;
use std::path::PathBuf;
use tracing::debug;

/// Directory stack rooted at `root`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![ROOT.to_string()],
        }
    }

    /// Segments below the root
    pub fn segments(&self) -> &[String] {
        &self.stack[1..]
    }

    pub fn is_at_root(&self) -> bool {
        self.stack.len() == 1
    }

    /// The stack as a path, root included (`root/exe`)
    pub fn current_path(&self) -> String {
        self.stack.join(&SEPARATOR.to_string())
    }

    /// Apply the segments of `path` one at a time.
    ///
    /// Stops at the first segment that is not a child directory; segments
    /// already applied stay applied.
    pub async fn change_directory(&mut self, namespace: &dyn Namespace, path: &str) -> Result<()> {
        for (i, segment) in path.split(SEPARATOR).enumerate() {
            match segment {
                "" | "." => {}
                ".." => {
                    if !self.is_at_root() {
                        self.stack.pop();
                    }
                }
                ROOT if i == 0 => self.stack.truncate(1),
                name => {
                    let mut candidate = self.segments().to_vec();
                    candidate.push(name.to_string());
                    if !namespace.is_dir(&candidate).await? {
                        debug!("cd stopped at '{}' in {}", name, self.current_path());
                        return Err(Error::Namespace(NamespaceError::NotADirectory(
                            name.to_string(),
                        )));
                    }
                    self.stack.push(name.to_string());
                }
            }
        }
        Ok(())
    }

    /// Where `path` leads from here, without moving
    pub async fn resolve(&self, namespace: &dyn Namespace, path: &str) -> Result<Navigator> {
        let mut scratch = self.clone();
        scratch.change_directory(namespace, path).await?;
        Ok(scratch)
    }

    /// Children of `path` (default: the current directory)
    pub async fn list(&self, namespace: &dyn Namespace, path: Option<&str>) -> Result<Vec<Entry>> {
        let target = match path {
            Some(path) => self.resolve(namespace, path).await?,
            None => self.clone(),
        };
        namespace.list(target.segments()).await
    }

    /// Host directory of the current directory
    pub fn host_path(&self, namespace: &dyn Namespace) -> Option<PathBuf> {
        namespace.host_path(self.segments())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
