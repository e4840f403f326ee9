// ================
// common/src/lib.rs
// ================
//! Common types shared between the admin gate and its clients.
//! This module defines the structured API envelope and the login payloads.

use serde::{Deserialize, Serialize};

/// Caller identity. Zero or negative values denote a guest.
pub type Uid = i64;

/// Returns `true` when `uid` does not belong to a logged-in account.
pub fn is_guest(uid: Uid) -> bool {
    uid <= 0
}

/// Status block of a structured API response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    /// Machine readable code, e.g. `not-authorised`
    pub code: String,
    /// Human readable explanation
    pub message: String,
}

/// Structured envelope returned to API-style callers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: ApiStatus,
    pub response: serde_json::Value,
}

impl ApiResponse {
    /// Build the envelope for an HTTP status code with an empty payload.
    pub fn for_status(status: u16) -> Self {
        let (code, message) = status_text(status);
        Self {
            status: ApiStatus {
                code: code.to_string(),
                message: message.to_string(),
            },
            response: serde_json::json!({}),
        }
    }
}

fn status_text(status: u16) -> (&'static str, &'static str) {
    match status {
        200 => ("ok", "OK"),
        400 => (
            "bad-request",
            "Something was wrong with the request payload you passed in.",
        ),
        401 => (
            "not-authorised",
            "A valid login session was not found. Please log in and try again.",
        ),
        403 => ("forbidden", "You are not authorised to make this call"),
        404 => ("not-found", "Invalid API call"),
        429 => (
            "too-many-requests",
            "You have made too many requests, please try again later",
        ),
        503 => (
            "service-unavailable",
            "The service is currently unavailable, please try again later",
        ),
        _ => (
            "internal-server-error",
            "Something went wrong while processing this request",
        ),
    }
}

/// Login request body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub uid: Uid,
    pub password: String,
}

/// Login response body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Where the client should navigate next
    pub next: String,
}
