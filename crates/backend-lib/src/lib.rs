// ============================
// admin-gate/src/lib.rs
// ============================
//! Administrative re-authentication gate.
//!
//! An axum middleware that guards the admin area: callers need the privilege
//! for the part of the area they request, and elevated sessions have to prove
//! their password again once the configured grace window has elapsed.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod hooks;
pub mod metrics;
pub mod middleware;
pub mod privileges;
pub mod router;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::{AccountStore, InMemoryAccounts, SessionStore};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::error::AppError;
use crate::gate::{AdminGate, ReloginTimer};
use crate::hooks::{HookBus, HookRegistry};
use crate::privileges::{InMemoryPrivileges, PrivilegeStore};

/// External systems the gate consults
#[derive(Clone)]
pub struct Collaborators {
    pub privileges: Arc<dyn PrivilegeStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub hooks: Arc<dyn HookBus>,
    pub clock: Arc<dyn Clock>,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// The admin gate
    pub gate: Arc<AdminGate>,
    /// Session store
    pub sessions: SessionStore,
    /// Account subsystem, used by the login handler
    pub accounts: Arc<dyn AccountStore>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(settings: Settings, collaborators: Collaborators) -> Self {
        let Collaborators {
            privileges,
            accounts,
            hooks,
            clock,
        } = collaborators;

        let gate = AdminGate::new(
            privileges,
            accounts.clone(),
            hooks,
            clock.clone(),
            ReloginTimer::from_millis(settings.relogin_grace_ms()),
            settings.relative_path.clone(),
        );
        let sessions = SessionStore::new(
            clock.clone(),
            Duration::from_secs(settings.session_ttl_secs),
        );

        Self {
            gate: Arc::new(gate),
            sessions,
            accounts,
            clock,
            settings: Arc::new(settings),
        }
    }

    /// State backed by seeded in-memory stores and the system clock
    pub fn in_memory(settings: Settings) -> Result<(Self, InMemoryBackends), AppError> {
        let backends = InMemoryBackends::seeded(&settings)?;
        let state = Self::new(settings, backends.collaborators(Arc::new(SystemClock)));
        Ok((state, backends))
    }
}

/// The in-memory collaborators, kept as concrete handles so callers can
/// grant privileges, set passwords and register hooks at runtime.
#[derive(Clone)]
pub struct InMemoryBackends {
    pub privileges: Arc<InMemoryPrivileges>,
    pub accounts: Arc<InMemoryAccounts>,
    pub hooks: Arc<HookRegistry>,
}

impl InMemoryBackends {
    /// Empty stores
    pub fn new(settings: &Settings) -> Self {
        Self {
            privileges: Arc::new(InMemoryPrivileges::new()),
            accounts: Arc::new(InMemoryAccounts::new(
                settings.password_requirements.clone(),
            )),
            hooks: Arc::new(HookRegistry::new()),
        }
    }

    /// Stores populated from `settings.accounts`
    pub fn seeded(settings: &Settings) -> Result<Self, AppError> {
        let backends = Self::new(settings);
        for account in &settings.accounts {
            backends.accounts.insert(account.uid);
            if let Some(password) = &account.password {
                backends.accounts.set_password(account.uid, password)?;
            }
            if account.administrator {
                backends.privileges.add_administrator(account.uid);
            }
            for privilege in &account.privileges {
                backends.privileges.grant(account.uid, privilege.as_str());
            }
        }
        info!(accounts = settings.accounts.len(), "in-memory stores seeded");
        Ok(backends)
    }

    /// Wire the stores up as gate collaborators
    pub fn collaborators(&self, clock: Arc<dyn Clock>) -> Collaborators {
        Collaborators {
            privileges: self.privileges.clone(),
            accounts: self.accounts.clone(),
            hooks: self.hooks.clone(),
            clock,
        }
    }
}
