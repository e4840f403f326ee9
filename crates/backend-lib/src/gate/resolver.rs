//! Privilege resolution for admin sub-paths.
use std::sync::Arc;

use admin_gate_common::Uid;
use tracing::debug;

use crate::error::AppError;
use crate::privileges::PrivilegeStore;

/// Decides whether a caller may enter a given part of the admin area
#[derive(Clone)]
pub struct PrivilegeResolver {
    store: Arc<dyn PrivilegeStore>,
}

impl PrivilegeResolver {
    pub fn new(store: Arc<dyn PrivilegeStore>) -> Self {
        Self { store }
    }

    /// A non-empty path needs its resolved privilege. The bare admin root
    /// needs any privilege at all. Store faults are returned, never mapped to a verdict.
    pub async fn resolve_and_check(&self, admin_path: &str, uid: Uid) -> Result<bool, AppError> {
        if admin_path.is_empty() {
            let set = self.store.get_all(uid).await?;
            let allowed = set.values().any(|granted| *granted);
            debug!(uid, allowed, "checked admin root against full privilege set");
            return Ok(allowed);
        }

        let privilege = self.store.resolve(admin_path);
        let allowed = self.store.can(&privilege, uid).await?;
        debug!(uid, %privilege, admin_path, allowed, "checked admin privilege");
        Ok(allowed)
    }
}
