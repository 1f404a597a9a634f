//! Persisted account registry

use crate::error::{AccountError, Error, Result};
use crate::types::{Account, AccountData, PasswordDigest};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Account registry bound to its backing file.
///
/// Every mutation is written through before the call returns.
#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    data: AccountData,
}

impl AccountStore {
    /// Create an empty store at `path`, replacing anything there
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            data: AccountData::default(),
        };
        store.persist()?;
        info!("Initialized account store at {:?}", store.path);
        Ok(store)
    }

    /// Load the store at `path`. Unreadable content is fatal.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        let data: AccountData = serde_json::from_str(&content).map_err(|e| {
            Error::Account(AccountError::CorruptStore(format!("{}: {}", path.display(), e)))
        })?;

        if let Some(current) = data.current {
            if current >= data.all.len() {
                return Err(Error::Account(AccountError::CorruptStore(format!(
                    "{}: current account {} out of {}",
                    path.display(),
                    current,
                    data.all.len()
                ))));
            }
        }

        debug!("Loaded {} accounts from {:?}", data.all.len(), path);
        Ok(Self { path, data })
    }

    /// Load the store, creating an empty one if the file does not exist
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Self::initialize(path)
        }
    }

    /// Rewrite the backing file atomically (temp file, then rename)
    pub fn persist(&self) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.data.serialize(&mut serializer)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(&buffer)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Persisted account store to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &AccountData {
        &self.data
    }

    pub fn accounts(&self) -> &[Account] {
        &self.data.all
    }

    pub fn is_empty(&self) -> bool {
        self.data.all.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.data.current
    }

    pub fn account(&self, index: usize) -> Result<&Account> {
        self.data
            .all
            .get(index)
            .ok_or(Error::Account(AccountError::IndexOutOfRange(index)))
    }

    pub fn contains_username(&self, username: &str) -> bool {
        self.data.all.iter().any(|a| a.username == username)
    }

    /// Append a new account and select it
    pub fn create_account(&mut self, username: impl Into<String>, digest: PasswordDigest) -> Result<usize> {
        let username = username.into();
        if self.contains_username(&username) {
            return Err(Error::Account(AccountError::UsernameTaken(username)));
        }

        let previous = self.data.current;
        let index = self.data.all.len();
        self.data.all.push(Account::new(username, digest));
        self.data.current = Some(index);

        if let Err(e) = self.persist() {
            self.data.all.pop();
            self.data.current = previous;
            return Err(e);
        }

        info!("Created account '{}' at index {}", self.data.all[index].username, index);
        Ok(index)
    }

    /// Compare `digest` with the stored digest of account `index`
    pub fn verify(&self, index: usize, digest: &PasswordDigest) -> Result<bool> {
        Ok(self.account(index)?.password_digest == *digest)
    }

    /// Select account `index` after a successful login
    pub fn record_login(&mut self, index: usize) -> Result<()> {
        self.account(index)?;
        let previous = self.data.current;
        self.data.current = Some(index);

        if let Err(e) = self.persist() {
            self.data.current = previous;
            return Err(e);
        }
        Ok(())
    }
}
