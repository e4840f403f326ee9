// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const GATE_PROCEEDED: &str = "gate.proceeded";
pub const GATE_REJECTED: &str = "gate.rejected";
pub const GATE_RELOGIN: &str = "gate.relogin";
pub const GATE_EXTENDED: &str = "gate.extended";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const LOGIN_FAILED: &str = "login.failed";
