// ============================
// admin-gate/src/auth/session.rs
// ============================
//! Session token handling and management.
use std::{sync::Arc, time::Duration};

use admin_gate_common::Uid;
use dashmap::DashMap;
use metrics::{counter, gauge};
use tracing::debug;

use super::token_generator::generate_secure_token;
use crate::clock::Clock;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};

/// Timing state of an elevated session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionMeta {
    /// Moment of the last full authentication, unix milliseconds
    pub datetime: i64,
}

/// Session information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: Uid,
    pub meta: Option<SessionMeta>,
    /// Where to send the caller once they have logged in again
    pub return_to: Option<String>,
    /// Set to `1` when the next login must be a full password login
    pub force_login: u8,
    /// Expiry, unix milliseconds
    pub expires_at: i64,
}

impl Session {
    /// Session of a caller that is not logged in
    pub fn guest() -> Self {
        Self {
            uid: 0,
            meta: None,
            return_to: None,
            force_login: 0,
            expires_at: i64::MAX,
        }
    }

    /// Fresh session for `uid`, authenticated at `now_ms`
    pub fn authenticated(uid: Uid, now_ms: i64, ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            uid,
            meta: Some(SessionMeta { datetime: now_ms }),
            return_to: None,
            force_login: 0,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }
}

/// In-memory session store keyed by cookie token
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            clock,
            ttl,
        }
    }

    /// Create a session for `uid` and return its token
    pub fn create(&self, uid: Uid) -> String {
        let token = generate_secure_token();
        let session = Session::authenticated(uid, self.clock.now_ms(), self.ttl);
        self.sessions.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        debug!(uid, "session created");

        token
    }

    /// Store a session built elsewhere (a guest carrying `return_to`) under a
    /// new token. Its expiry is reset to the store TTL.
    pub fn insert(&self, mut session: Session) -> String {
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        session.expires_at = self.clock.now_ms().saturating_add(ttl_ms);
        let token = generate_secure_token();
        self.sessions.insert(token.clone(), session);
        gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        token
    }

    /// Snapshot of a live session. Expired sessions are dropped.
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = self.clock.now_ms();
        let session = self.sessions.get(token).map(|s| s.clone())?;
        if session.expires_at <= now {
            self.sessions.remove(token);
            counter!(SESSION_EXPIRED).increment(1);
            return None;
        }
        Some(session)
    }

    /// Write a session back. Last write wins.
    pub fn save(&self, token: &str, session: Session) {
        self.sessions.insert(token.to_string(), session);
    }

    pub fn remove(&self, token: &str) -> Option<Session> {
        self.sessions.remove(token).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove expired sessions, returning how many were dropped
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
        removed
    }

    /// Spawn the periodic cleanup task on the current runtime
    pub fn spawn_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = store.cleanup();
                if removed > 0 {
                    debug!(removed, "expired sessions removed");
                }
            }
        })
    }
}
