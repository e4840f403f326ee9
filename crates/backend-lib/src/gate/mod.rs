// ============================
// admin-gate/src/gate/mod.rs
// ============================
//! The admin gate.
//!
//! For every request into the admin area the gate runs, in order and stopping
//! at the first decisive step:
//!
//! 1. reject guests;
//! 2. resolve the admin sub-path and check the caller's privilege;
//! 3. let accounts without a password through;
//! 4. run the re-authentication timer, forcing a password login when the
//!    grace window has elapsed and sliding it forward otherwise.

pub mod path;
pub mod relogin;
pub mod resolver;
pub mod responses;
pub mod timer;

pub use relogin::ReloginDispatcher;
pub use resolver::PrivilegeResolver;
pub use timer::{ReloginTimer, TimerState, EXTENSION_CAP_MS};

use std::sync::Arc;

use admin_gate_common::{is_guest, Uid};
use axum::response::Response;
use metrics::counter;
use tracing::debug;

use crate::auth::{AccountStore, Session};
use crate::clock::Clock;
use crate::error::AppError;
use crate::hooks::HookBus;
use crate::metrics::{GATE_EXTENDED, GATE_PROCEEDED, GATE_REJECTED, GATE_RELOGIN};
use crate::privileges::PrivilegeStore;

/// What the gate knows about the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub uid: Uid,
    /// Full request path, routing prefix included
    pub path: String,
    /// Caller expects a structured API response
    pub is_api: bool,
}

impl RequestContext {
    pub fn new(uid: Uid, path: impl Into<String>, relative_path: &str) -> Self {
        let path = path.into();
        let is_api = path::is_api_path(&path, relative_path);
        Self { uid, path, is_api }
    }
}

/// Result of one pass through the gate
#[derive(Debug)]
pub enum GateOutcome {
    /// Hand the request to the next handler
    Proceed,
    /// Guest or missing privilege
    NotAllowed(Response),
    /// Grace window elapsed; carries the re-login response
    Relogin(Response),
}

impl GateOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateOutcome::Proceed)
    }
}

/// Request-time guard for the admin area
pub struct AdminGate {
    resolver: PrivilegeResolver,
    accounts: Arc<dyn AccountStore>,
    relogin: ReloginDispatcher,
    timer: ReloginTimer,
    clock: Arc<dyn Clock>,
    relative_path: String,
}

impl AdminGate {
    pub fn new(
        privileges: Arc<dyn PrivilegeStore>,
        accounts: Arc<dyn AccountStore>,
        hooks: Arc<dyn HookBus>,
        clock: Arc<dyn Clock>,
        timer: ReloginTimer,
        relative_path: impl Into<String>,
    ) -> Self {
        let relative_path = relative_path.into();
        Self {
            resolver: PrivilegeResolver::new(privileges),
            accounts,
            relogin: ReloginDispatcher::new(hooks, relative_path.clone()),
            timer,
            clock,
            relative_path,
        }
    }

    /// Decide one request. `session` is the caller's session snapshot; the gate
    /// may slide its timestamp or mark it for a forced login.
    pub async fn check(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
    ) -> Result<GateOutcome, AppError> {
        if is_guest(ctx.uid) {
            debug!(path = %ctx.path, "guest rejected from admin area");
            counter!(GATE_REJECTED, "reason" => "guest").increment(1);
            if !ctx.is_api {
                session.return_to = Some(path::return_to(&ctx.path, &self.relative_path));
            }
            return Ok(GateOutcome::NotAllowed(responses::not_allowed(
                ctx,
                &self.relative_path,
            )));
        }

        let local = path::strip_relative_path(&ctx.path, &self.relative_path);
        let admin_path = path::admin_path(local);
        if !self.resolver.resolve_and_check(admin_path, ctx.uid).await? {
            debug!(uid = ctx.uid, admin_path, "caller lacks admin privilege");
            counter!(GATE_REJECTED, "reason" => "privilege").increment(1);
            return Ok(GateOutcome::NotAllowed(responses::not_allowed(
                ctx,
                &self.relative_path,
            )));
        }

        if !self.accounts.has_password(ctx.uid).await? {
            debug!(uid = ctx.uid, "account has no password, skipping re-login check");
            counter!(GATE_PROCEEDED).increment(1);
            return Ok(GateOutcome::Proceed);
        }

        let now = self.clock.now_ms();
        match self.timer.evaluate(session.meta.as_ref(), now) {
            TimerState::Stale => {
                counter!(GATE_RELOGIN).increment(1);
                let response = self.relogin.dispatch(ctx, session).await?;
                Ok(GateOutcome::Relogin(response))
            }
            TimerState::Fresh => {
                if self.timer.extend(session.meta.as_mut(), now) {
                    debug!(uid = ctx.uid, "admin grace window extended");
                    counter!(GATE_EXTENDED).increment(1);
                }
                counter!(GATE_PROCEEDED).increment(1);
                Ok(GateOutcome::Proceed)
            }
        }
    }
}
