//! Access mode, permission and resource types

use super::Rank;
use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Bitmask of access modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessMode(u8);

impl AccessMode {
    pub const PRIVATE: AccessMode = AccessMode(0b000);
    pub const READ: AccessMode = AccessMode(0b001);
    pub const WRITE: AccessMode = AccessMode(0b010);
    pub const DELETE: AccessMode = AccessMode(0b100);
    pub const ALL: AccessMode = AccessMode(0b111);

    /// Named modes, in bit order
    pub const NAMED: [(&'static str, AccessMode); 3] = [
        ("READ", AccessMode::READ),
        ("WRITE", AccessMode::WRITE),
        ("DELETE", AccessMode::DELETE),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when every mode in `other` is also in `self`
    pub const fn contains(self, other: AccessMode) -> bool {
        other.0 & !self.0 == 0
    }

    pub const fn is_private(self) -> bool {
        self.0 == 0
    }

    /// Every one of the eight mode combinations, `PRIVATE` first
    pub fn combinations() -> impl Iterator<Item = AccessMode> {
        (0..=Self::ALL.0).map(AccessMode)
    }
}

impl BitOr for AccessMode {
    type Output = AccessMode;

    fn bitor(self, rhs: AccessMode) -> AccessMode {
        AccessMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for AccessMode {
    fn bitor_assign(&mut self, rhs: AccessMode) {
        self.0 |= rhs.0;
    }
}

impl FromStr for AccessMode {
    type Err = AccessError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "PRIVATE" => Ok(AccessMode::PRIVATE),
            "READ" => Ok(AccessMode::READ),
            "WRITE" => Ok(AccessMode::WRITE),
            "DELETE" => Ok(AccessMode::DELETE),
            other => Err(AccessError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_private() {
            return f.write_str("PRIVATE");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, mode)| self.contains(*mode))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join("|"))
    }
}

/// Per-rank grants for one resource.
///
/// Construction guarantees `owner ⊇ admin ⊇ user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    user: AccessMode,
    admin: AccessMode,
    owner: AccessMode,
}

impl Permission {
    pub fn new(user: AccessMode, admin: AccessMode, owner: AccessMode) -> Result<Self, AccessError> {
        if !admin.contains(user) {
            return Err(AccessError::InvalidHierarchy {
                rank: Rank::User,
                granted: user.bits(),
                parent: admin.bits(),
            });
        }
        if !owner.contains(admin) {
            return Err(AccessError::InvalidHierarchy {
                rank: Rank::Admin,
                granted: admin.bits(),
                parent: owner.bits(),
            });
        }
        Ok(Self { user, admin, owner })
    }

    /// Modes granted to `rank`
    pub fn granted(&self, rank: Rank) -> AccessMode {
        match rank {
            Rank::User => self.user,
            Rank::Admin => self.admin,
            Rank::Owner => self.owner,
        }
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self {
            user: AccessMode::READ,
            admin: AccessMode::ALL,
            owner: AccessMode::ALL,
        }
    }
}

/// Result of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Granted,
    Denied,
}

impl AccessStatus {
    pub fn is_granted(&self) -> bool {
        *self == AccessStatus::Granted
    }
}

/// What a namespace resource is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Runnable,
    Data,
}

/// A file in the namespace together with its permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    pub permission: Permission,
}

impl Resource {
    pub fn runnable(name: impl Into<String>, permission: Permission) -> Self {
        Self {
            name: name.into(),
            kind: ResourceKind::Runnable,
            permission,
        }
    }

    pub fn data(name: impl Into<String>, permission: Permission) -> Self {
        Self {
            name: name.into(),
            kind: ResourceKind::Data,
            permission,
        }
    }
}
