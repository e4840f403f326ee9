// ============================
// admin-gate/src/hooks.rs
// ============================
//! Extension points fired by the gate.
//!
//! A hook may complete the response itself. The bus reports that by returning
//! the response, so the caller never answers a request twice.
use std::sync::{Arc, RwLock};

use admin_gate_common::Uid;
use async_trait::async_trait;
use axum::response::Response;
use tracing::debug;

use crate::error::AppError;

/// Fired when an elevated session has to prove its identity again
pub const RELOGIN_EVENT: &str = "response:auth.relogin";

/// Payload of [`RELOGIN_EVENT`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloginEvent {
    pub uid: Uid,
    /// Full request path
    pub path: String,
    /// Where the caller will be sent back to after logging in
    pub return_to: String,
    pub is_api: bool,
}

/// One extension listening for re-login events
#[async_trait]
pub trait ReloginHook: Send + Sync {
    fn name(&self) -> &str;

    /// Return `Some` to take over the response
    async fn on_relogin(&self, event: &ReloginEvent) -> Result<Option<Response>, AppError>;
}

/// Dispatches gate events to extensions
#[async_trait]
pub trait HookBus: Send + Sync {
    /// Fire [`RELOGIN_EVENT`]. `Some` means an extension already produced the response.
    async fn fire_relogin(&self, event: &ReloginEvent) -> Result<Option<Response>, AppError>;
}

/// Ordered list of hooks. The first hook that responds wins.
#[derive(Default)]
pub struct HookRegistry {
    relogin: RwLock<Vec<Arc<dyn ReloginHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_relogin(&self, hook: Arc<dyn ReloginHook>) {
        debug!(hook = hook.name(), event = RELOGIN_EVENT, "hook registered");
        self.relogin
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(hook);
    }

    pub fn len(&self) -> usize {
        self.relogin
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HookBus for HookRegistry {
    async fn fire_relogin(&self, event: &ReloginEvent) -> Result<Option<Response>, AppError> {
        // snapshot so the lock is not held across awaits
        let hooks: Vec<Arc<dyn ReloginHook>> = self
            .relogin
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for hook in hooks {
            if let Some(response) = hook.on_relogin(event).await? {
                debug!(hook = hook.name(), event = RELOGIN_EVENT, "hook produced the response");
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
