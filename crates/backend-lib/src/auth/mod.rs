// ============================
// admin-gate/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod accounts;
pub mod login;
pub mod password;
pub mod session;
pub mod token_generator;

pub use accounts::{AccountStore, InMemoryAccounts};
pub use login::{login, session_cookie};
pub use password::{hash_password, verify_password, validate_password_strength, PasswordRequirements, MIN_PASSWORD_LENGTH};
pub use session::{Session, SessionMeta, SessionStore};
