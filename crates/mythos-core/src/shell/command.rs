//! External command lookup and execution

use crate::error::{CommandError, Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Exit status a child uses to ask for an early return to the prompt
pub const EARLY_EXIT_STATUS: i32 = 130;

/// Maps a command name to the file holding its code
#[cfg_attr(test, mockall::automock)]
pub trait CommandResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

/// Looks for a regular file called `name` in each search directory of the
/// namespace, in order
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    root: PathBuf,
    search_paths: Vec<String>,
}

impl SearchPathResolver {
    pub fn new(root: impl Into<PathBuf>, search_paths: Vec<String>) -> Self {
        Self {
            root: root.into(),
            search_paths,
        }
    }

    /// Every match for `name`, in search order
    pub fn resolve_all(&self, name: &str) -> Vec<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
            return Vec::new();
        }
        self.search_paths
            .iter()
            .map(|dir| {
                dir.split('/')
                    .filter(|s| !s.is_empty())
                    .fold(self.root.clone(), |path, segment| path.join(segment))
                    .join(name)
            })
            .filter(|candidate| candidate.is_file())
            .collect()
    }
}

impl CommandResolver for SearchPathResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.resolve_all(name).into_iter().next()
    }
}

/// A resolved external command ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

/// Runs external commands
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// `Err(CommandError::EarlyExit)` means the command asked to return to
    /// the prompt.
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs commands as child processes sharing the terminal
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!(
            "Executing command: {} {:?} (cwd: {:?})",
            invocation.program.display(),
            invocation.args,
            invocation.working_dir
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await.map_err(|e| {
            Error::Command(CommandError::Spawn {
                name: invocation.name.clone(),
                reason: e.to_string(),
            })
        })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(EARLY_EXIT_STATUS) => Err(Error::Command(CommandError::EarlyExit)),
            code => Err(Error::Command(CommandError::Failed {
                name: invocation.name.clone(),
                code: code.unwrap_or(-1),
            })),
        }
    }
}
