//! Shell configuration
//!
//! Loaded from `mythos.json` in the data directory. Every field has a
//! default, so a missing file yields a working configuration.

use crate::access::permission_bitmask;
use crate::error::{Error, Result};
use crate::types::{AccessMode, Permission, Rank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "mythos.json";

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "MYTHOS_HOME";

/// Mode names granted to one resource, per rank. Ranks left out get the
/// default grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Vec<String>>,
}

impl PermissionSpec {
    pub fn build(&self) -> Result<Permission> {
        let defaults = Permission::default();
        let grant = |names: &Option<Vec<String>>, fallback: AccessMode| -> Result<AccessMode> {
            match names {
                Some(names) => Ok(permission_bitmask(names)?),
                None => Ok(fallback),
            }
        };
        let permission = Permission::new(
            grant(&self.user, defaults.granted(Rank::User))?,
            grant(&self.admin, defaults.granted(Rank::Admin))?,
            grant(&self.owner, defaults.granted(Rank::Owner))?,
        )?;
        Ok(permission)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shown in the header bar
    pub version: String,
    /// Credential store file, relative to the data directory
    pub account_file: PathBuf,
    /// Backing directory of the namespace, relative to the data directory
    pub namespace_root: PathBuf,
    /// Namespace directories searched for external commands
    pub search_paths: Vec<String>,
    /// Password attempts allowed per login; unbounded when `None`
    pub max_login_attempts: Option<u32>,
    pub min_password_length: usize,
    /// Per-command permission overrides
    pub permissions: HashMap<String, PermissionSpec>,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            account_file: PathBuf::from("account_data.json"),
            namespace_root: PathBuf::from("root"),
            search_paths: vec!["exe".to_string()],
            max_login_attempts: None,
            min_password_length: 8,
            permissions: HashMap::new(),
            data_dir: PathBuf::from("."),
        }
    }
}

impl ShellConfig {
    /// Load `mythos.json` from `data_dir`, falling back to defaults when the
    /// file does not exist. Permission overrides are validated here so a bad
    /// mode name stops the boot.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            debug!("Loading config from {:?}", path);
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str::<ShellConfig>(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            info!("No config at {:?}, using defaults", path);
            ShellConfig::default()
        };
        config.data_dir = data_dir.to_path_buf();

        for (name, spec) in &config.permissions {
            spec.build()
                .map_err(|e| Error::Config(format!("permissions for '{}': {}", name, e)))?;
        }

        Ok(config)
    }

    pub fn account_path(&self) -> PathBuf {
        self.data_dir.join(&self.account_file)
    }

    pub fn namespace_path(&self) -> PathBuf {
        self.data_dir.join(&self.namespace_root)
    }

    /// Permission of the external command `name`
    pub fn permission_for(&self, name: &str) -> Result<Permission> {
        match self.permissions.get(name) {
            Some(spec) => spec.build(),
            None => Ok(Permission::default()),
        }
    }
}

/// Pick the data directory: explicit flag, then `MYTHOS_HOME`, then the
/// platform data directory, then `./mythos`.
pub fn resolve_data_dir(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env)
        .or_else(|| dirs::data_dir().map(|d| d.join("mythos")))
        .unwrap_or_else(|| PathBuf::from("mythos"))
}
