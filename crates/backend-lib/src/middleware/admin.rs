//! Axum adapter around [`AdminGate`](crate::gate::AdminGate).
use std::sync::Arc;

use admin_gate_common::Uid;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{session_cookie, Session};
use crate::error::AppError;
use crate::gate::{GateOutcome, RequestContext};
use crate::AppState;

/// Caller that passed the gate, available to handlers as an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub uid: Uid,
}

/// Admin gate middleware.
///
/// Either runs `next` or answers the request itself, never both. Collaborator
/// faults surface as [`AppError`] and become a 500.
pub async fn check_privileges(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let loaded = jar
        .get(&state.settings.session_cookie)
        .map(|cookie| cookie.value().to_string())
        .and_then(|token| state.sessions.get(&token).map(|session| (token, session)));
    let (token, mut session) = match loaded {
        Some((token, session)) => (Some(token), session),
        None => (None, Session::guest()),
    };
    let before = session.clone();

    let ctx = RequestContext::new(
        session.uid,
        request.uri().path(),
        &state.settings.relative_path,
    );
    let outcome = state.gate.check(&ctx, &mut session).await;

    // Write back whatever the gate changed, even when it failed afterwards.
    // A guest without a session gets one so its `return_to` survives to login.
    let mut issued = None;
    if session != before {
        match token {
            Some(token) => state.sessions.save(&token, session),
            None => issued = Some(state.sessions.insert(session)),
        }
    }

    let response = match outcome? {
        GateOutcome::Proceed => {
            request.extensions_mut().insert(Caller { uid: ctx.uid });
            next.run(request).await
        }
        GateOutcome::NotAllowed(response) | GateOutcome::Relogin(response) => response,
    };
    Ok(match issued {
        Some(token) => {
            let cookie = session_cookie(&state.settings.session_cookie, token);
            (jar.add(cookie), response).into_response()
        }
        None => response,
    })
}
