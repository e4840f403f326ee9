// ============================
// admin-gate/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;

use admin_gate_common::Uid;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordRequirements;
use crate::error::AppError;

/// Default config file looked up by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "gate.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GATE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Routing prefix the whole site is mounted under, e.g. `/forum`
    pub relative_path: String,
    /// Minutes an elevated session stays trusted; `0` disables forced re-login
    pub admin_relogin_duration: u64,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Name of the session cookie
    pub session_cookie: String,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
    /// Accounts loaded into the in-memory stores at startup
    pub accounts: Vec<SeedAccount>,
}

/// Account definition used to seed the in-memory collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedAccount {
    pub uid: Uid,
    pub password: Option<String>,
    pub administrator: bool,
    pub privileges: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4567)),
            log_level: "info".to_string(),
            log_json: false,
            relative_path: String::new(),
            admin_relogin_duration: 60,
            session_ttl_secs: 60 * 60 * 24 * 14, // 14 days
            session_cookie: "gate.sid".to_string(),
            password_requirements: PasswordRequirements::default(),
            accounts: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `gate.toml`, `gate.json` and `GATE_*` variables
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings using `path` as the TOML config file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Json::file("gate.json"))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Start building settings programmatically
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Check invariants the rest of the crate relies on
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level `{}`",
                self.log_level
            )));
        }
        if self.session_ttl_secs == 0 {
            return Err(AppError::Config("session_ttl_secs must be positive".into()));
        }
        if !self.relative_path.is_empty()
            && (!self.relative_path.starts_with('/') || self.relative_path.ends_with('/'))
        {
            return Err(AppError::Config(format!(
                "relative_path `{}` must start with `/` and must not end with `/`",
                self.relative_path
            )));
        }
        if self.session_cookie.is_empty() {
            return Err(AppError::Config("session_cookie must not be empty".into()));
        }
        if let Some(account) = self.accounts.iter().find(|a| a.uid <= 0) {
            return Err(AppError::Config(format!(
                "seed account uid {} is not a valid account id",
                account.uid
            )));
        }
        Ok(())
    }

    /// Grace window in milliseconds
    pub fn relogin_grace_ms(&self) -> i64 {
        i64::try_from(self.admin_relogin_duration)
            .unwrap_or(i64::MAX / 60_000)
            .saturating_mul(60_000)
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.settings.bind_addr = addr;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.settings.log_level = level.into();
        self
    }

    pub fn relative_path(mut self, path: impl Into<String>) -> Self {
        self.settings.relative_path = path.into();
        self
    }

    pub fn admin_relogin_duration(mut self, minutes: u64) -> Self {
        self.settings.admin_relogin_duration = minutes;
        self
    }

    pub fn session_ttl(mut self, secs: u64) -> Self {
        self.settings.session_ttl_secs = secs;
        self
    }

    pub fn account(mut self, account: SeedAccount) -> Self {
        self.settings.accounts.push(account);
        self
    }

    pub fn build(self) -> Result<Settings, AppError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
