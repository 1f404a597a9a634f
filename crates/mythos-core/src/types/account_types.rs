//! Account and credential store types

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Privilege rank of an account, ordered from least to most privileged
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    #[default]
    User,
    Admin,
    Owner,
}

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::User, Rank::Admin, Rank::Owner];

    pub fn is_user(&self) -> bool {
        *self == Rank::User
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::User => "USER",
            Rank::Admin => "ADMIN",
            Rank::Owner => "OWNER",
        }
    }
}

/// Hex-encoded SHA-256 digest of a password.
///
/// The plaintext never leaves the input primitive; only this digest is
/// compared and stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(rename = "password")]
    pub password_digest: PasswordDigest,
    #[serde(default, skip_serializing_if = "Rank::is_user")]
    pub rank: Rank,
}

impl Account {
    pub fn new(username: impl Into<String>, password_digest: PasswordDigest) -> Self {
        Self {
            username: username.into(),
            password_digest,
            rank: Rank::default(),
        }
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }
}

/// On-disk layout of the credential store.
///
/// `current` is `-1` in the file when no account is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(with = "current_index")]
    pub current: Option<usize>,
    pub all: Vec<Account>,
}

mod current_index {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const NONE_SELECTED: i64 = -1;

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_i64(*index as i64),
            None => serializer.serialize_i64(NONE_SELECTED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        match i64::deserialize(deserializer)? {
            NONE_SELECTED => Ok(None),
            n if n >= 0 => Ok(Some(n as usize)),
            n => Err(D::Error::custom(format!("invalid current account index {}", n))),
        }
    }
}
