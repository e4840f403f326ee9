// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the admin area.

pub mod admin;

pub use admin::{check_privileges, Caller};
