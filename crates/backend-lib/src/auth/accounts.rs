//! Account subsystem: who has a password on file.
use admin_gate_common::Uid;
use async_trait::async_trait;
use dashmap::DashMap;

use super::password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
};
use crate::error::AppError;

/// Password facts about accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Whether `uid` has a password set at all
    async fn has_password(&self, uid: Uid) -> Result<bool, AppError>;

    /// Check `plain` against the stored password of `uid`
    async fn verify_password(&self, uid: Uid, plain: &str) -> Result<bool, AppError>;
}

/// Accounts kept in memory, passwords stored as argon2 hashes
pub struct InMemoryAccounts {
    accounts: DashMap<Uid, Option<String>>,
    requirements: PasswordRequirements,
}

impl InMemoryAccounts {
    pub fn new(requirements: PasswordRequirements) -> Self {
        Self {
            accounts: DashMap::new(),
            requirements,
        }
    }

    /// Register an account without a password, e.g. one created through SSO
    pub fn insert(&self, uid: Uid) {
        self.accounts.entry(uid).or_insert(None);
    }

    pub fn set_password(&self, uid: Uid, plain: &str) -> Result<(), AppError> {
        if uid <= 0 {
            return Err(AppError::InvalidInput(format!("uid {uid} cannot hold a password")));
        }
        if !validate_password_strength(plain, &self.requirements) {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {} characters and meet the complexity rules",
                self.requirements.min_length
            )));
        }
        let hash = hash_password(plain).map_err(|e| AppError::AccountStore(e.to_string()))?;
        self.accounts.insert(uid, Some(hash));
        Ok(())
    }

    pub fn clear_password(&self, uid: Uid) {
        if let Some(mut entry) = self.accounts.get_mut(&uid) {
            *entry = None;
        }
    }

    pub fn contains(&self, uid: Uid) -> bool {
        self.accounts.contains_key(&uid)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccounts {
    async fn has_password(&self, uid: Uid) -> Result<bool, AppError> {
        Ok(self
            .accounts
            .get(&uid)
            .is_some_and(|entry| entry.value().is_some()))
    }

    async fn verify_password(&self, uid: Uid, plain: &str) -> Result<bool, AppError> {
        let hash = match self.accounts.get(&uid) {
            Some(entry) => entry.value().clone(),
            None => return Ok(false),
        };
        Ok(hash.is_some_and(|hash| verify_password(&hash, plain)))
    }
}
