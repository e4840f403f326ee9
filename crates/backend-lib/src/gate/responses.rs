//! Response shapes produced by the gate.
use admin_gate_common::{is_guest, ApiResponse};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};

use super::RequestContext;

/// Structured envelope for API callers
pub fn format_api_response(status: StatusCode) -> Response {
    (status, Json(ApiResponse::for_status(status.as_u16()))).into_response()
}

/// Structured 401 for API callers that must log in again
pub fn format_unauthorized() -> Response {
    format_api_response(StatusCode::UNAUTHORIZED)
}

/// Browser redirect to the password login form
pub fn relogin_redirect(relative_path: &str) -> Response {
    Redirect::to(&format!("{relative_path}/login?local=1")).into_response()
}

/// Rejection for guests and callers lacking the privilege
pub fn not_allowed(ctx: &RequestContext, relative_path: &str) -> Response {
    match (is_guest(ctx.uid), ctx.is_api) {
        (true, true) => format_api_response(StatusCode::UNAUTHORIZED),
        (true, false) => Redirect::to(&format!("{relative_path}/login")).into_response(),
        (false, true) => format_api_response(StatusCode::FORBIDDEN),
        (false, false) => (
            StatusCode::FORBIDDEN,
            Html("<h1>403</h1><p>You do not have access to this page.</p>"),
        )
            .into_response(),
    }
}
