//! Side effects of a stale elevated session.
use std::sync::Arc;

use axum::response::Response;
use tracing::info;

use super::{path, responses, RequestContext};
use crate::auth::Session;
use crate::error::AppError;
use crate::hooks::{HookBus, ReloginEvent, RELOGIN_EVENT};

/// Marks the session for a forced login and answers the request
#[derive(Clone)]
pub struct ReloginDispatcher {
    hooks: Arc<dyn HookBus>,
    relative_path: String,
}

impl ReloginDispatcher {
    pub fn new(hooks: Arc<dyn HookBus>, relative_path: impl Into<String>) -> Self {
        Self {
            hooks,
            relative_path: relative_path.into(),
        }
    }

    /// Exactly one response comes back: the hook's, or the default one.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
    ) -> Result<Response, AppError> {
        let return_to = path::return_to(&ctx.path, &self.relative_path);
        session.return_to = Some(return_to.clone());
        session.force_login = 1;

        info!(uid = ctx.uid, %return_to, event = RELOGIN_EVENT, "admin session expired, forcing re-login");

        let event = ReloginEvent {
            uid: ctx.uid,
            path: ctx.path.clone(),
            return_to,
            is_api: ctx.is_api,
        };
        if let Some(response) = self.hooks.fire_relogin(&event).await? {
            return Ok(response);
        }

        Ok(if ctx.is_api {
            responses::format_unauthorized()
        } else {
            responses::relogin_redirect(&self.relative_path)
        })
    }
}
