//! Password login. A successful login restarts the admin grace window.
use std::sync::Arc;

use admin_gate_common::{is_guest, LoginRequest, LoginResponse};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use tracing::{info, warn};
use zeroize::Zeroize;

use super::{Session, SessionMeta};
use crate::error::AppError;
use crate::metrics::LOGIN_FAILED;
use crate::AppState;

/// Where a caller lands when no destination was recorded
const DEFAULT_NEXT: &str = "/admin";

/// `POST {relative_path}/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let LoginRequest { uid, mut password } = request;
    if uid <= 0 {
        password.zeroize();
        return Err(AppError::InvalidInput(format!("uid {uid} cannot log in")));
    }

    if !state.accounts.has_password(uid).await? {
        password.zeroize();
        return Err(AppError::Auth(format!("uid {uid} has no password login")));
    }

    let verified = state.accounts.verify_password(uid, &password).await;
    password.zeroize();
    if !verified? {
        warn!(uid, "password login failed");
        counter!(LOGIN_FAILED).increment(1);
        return Err(AppError::InvalidPassword);
    }

    let cookie_name = state.settings.session_cookie.as_str();
    let existing = jar.get(cookie_name).and_then(|cookie| {
        let token = cookie.value().to_string();
        state
            .sessions
            .get(&token)
            .filter(|session| session.uid == uid || is_guest(session.uid))
            .map(|session| (token, session))
    });
    let (token, mut session): (String, Session) = match existing {
        Some((token, session)) if session.uid == uid => (token, session),
        found => {
            // A guest session only donates its destination; the token is replaced.
            let return_to = found.and_then(|(guest_token, guest)| {
                state.sessions.remove(&guest_token);
                guest.return_to
            });
            let token = state.sessions.create(uid);
            let mut session = state
                .sessions
                .get(&token)
                .ok_or_else(|| AppError::Session("new session disappeared".to_string()))?;
            session.return_to = return_to;
            (token, session)
        }
    };

    session.meta = Some(SessionMeta {
        datetime: state.clock.now_ms(),
    });
    session.force_login = 0;
    let next = session
        .return_to
        .take()
        .unwrap_or_else(|| DEFAULT_NEXT.to_string());
    state.sessions.save(&token, session);

    info!(uid, %next, "password login succeeded");

    let cookie = session_cookie(cookie_name, token);
    let next = format!("{}{}", state.settings.relative_path, next);
    Ok((jar.add(cookie), Json(LoginResponse { next })))
}

/// Session cookie as sent to the browser
pub fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
