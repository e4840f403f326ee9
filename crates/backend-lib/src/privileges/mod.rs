// ============================
// admin-gate/src/privileges/mod.rs
// ============================
//! Administrative privileges: tokens, sets and the store the gate queries.

mod memory;

pub use memory::InMemoryPrivileges;

use std::collections::BTreeMap;
use std::fmt;

use admin_gate_common::Uid;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Symbolic name of one administrative capability, e.g. `admin:users`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegeToken(String);

impl PrivilegeToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Token for admin paths no finer privilege covers. Only administrators hold it.
    pub fn superadmin() -> Self {
        Self::new("admin:superadmin")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrivilegeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrivilegeToken {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Grants of one caller, token -> granted
pub type PrivilegeSet = BTreeMap<PrivilegeToken, bool>;

/// Source of truth for administrative privileges
#[async_trait]
pub trait PrivilegeStore: Send + Sync {
    /// Map an admin sub-path (no leading `/`) to the privilege guarding it
    fn resolve(&self, path: &str) -> PrivilegeToken;

    /// Whether `uid` holds `privilege`
    async fn can(&self, privilege: &PrivilegeToken, uid: Uid) -> Result<bool, AppError>;

    /// Every administrative privilege of `uid`
    async fn get_all(&self, uid: Uid) -> Result<PrivilegeSet, AppError>;
}
