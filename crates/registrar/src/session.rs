//! Explicit session context for signed-in dashboard users.
//!
//! A session is created when a user signs in (`init`), extended while they are
//! active (`refresh`) and dropped when they sign out (`clear`). Request
//! handlers receive the session's [`SubmitterContext`] instead of reading
//! ambient global state.

use crate::report::SubmitterContext;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// A session key derived from a bearer token.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a session key from a raw bearer token.
    ///
    /// The token is hashed so that it is never stored.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the internal hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show first 8 chars
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

/// Who is signed in and until when.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    pub key: SessionKey,
    pub user: SubmitterContext,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe store of live sessions.
pub struct SessionStore {
    sessions: DashMap<SessionKey, SessionContext>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a store whose sessions last `ttl` after init or refresh.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Starts (or restarts) the session for `token`.
    pub fn init(&self, token: &str, user: SubmitterContext) -> SessionContext {
        let now = Utc::now();
        let key = SessionKey::from_token(token);
        let context = SessionContext {
            key: key.clone(),
            user,
            started_at: now,
            expires_at: self.expiry_from(now),
        };

        info!(session = %key, role = %context.user.role, "Session started");
        self.sessions.insert(key, context.clone());
        context
    }

    /// Looks up a live session. Expired sessions are removed.
    pub fn get(&self, token: &str) -> Option<SessionContext> {
        let key = SessionKey::from_token(token);
        let entry = self.sessions.get(&key)?;
        if entry.is_expired_at(Utc::now()) {
            drop(entry);
            self.sessions.remove(&key);
            debug!(session = %key, "Session expired");
            None
        } else {
            Some(entry.clone())
        }
    }

    /// Extends a live session by the store's TTL.
    pub fn refresh(&self, token: &str) -> Option<SessionContext> {
        self.get(token)?;
        let key = SessionKey::from_token(token);
        let mut entry = self.sessions.get_mut(&key)?;
        entry.expires_at = self.expiry_from(Utc::now());
        debug!(session = %key, "Session refreshed");
        Some(entry.clone())
    }

    /// Ends the session for `token`. Returns true if one existed.
    pub fn clear(&self, token: &str) -> bool {
        let key = SessionKey::from_token(token);
        let removed = self.sessions.remove(&key).is_some();
        if removed {
            info!(session = %key, "Session cleared");
        }
        removed
    }

    /// Removes expired sessions.
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.sessions.retain(|_, s| !s.is_expired_at(now));
    }

    /// Returns the number of stored sessions (including expired ones).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Helper module for hex encoding.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
