// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
//!
//! Expiry is lazy: an expired session stays in the table until the next
//! lookup of its token (or an optional sweep) removes it. Callers never see
//! the difference between an expired, a revoked and an unknown token.
use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use loginsvc_common::{SessionInfo, SessionUser, UserId};
use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use super::token_generator::generate_session_token;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED, SESSION_REVOKED};

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24); // 24 hours

/// Session information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub login_time: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is still live at the instant it expires
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn user(&self) -> SessionUser {
        SessionUser {
            user_id: self.user_id,
            email: self.email.clone(),
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            user_id: self.user_id,
            email: self.email.clone(),
            login_time: self.login_time,
            expires_at: self.expires_at,
        }
    }
}

/// Token-keyed session storage handed to a [`SessionManager`].
///
/// Clones share the same entries. Only the manager reads or writes them.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    entries: Arc<DashMap<String, Session>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session manager for handling authentication tokens
#[derive(Debug, Clone)]
pub struct SessionManager {
    table: SessionTable,
    ttl: TimeDelta,
}

impl SessionManager {
    /// Create a session manager over `table` issuing sessions that live for `ttl`
    pub fn new(table: SessionTable, ttl: Duration) -> Self {
        Self {
            table,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Create a session manager with the default 24 hour TTL
    pub fn with_default_ttl(table: SessionTable) -> Self {
        Self::new(table, SESSION_TTL)
    }

    /// Lifetime of newly issued sessions
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Create a new session and return its token
    pub fn issue(&self, user_id: UserId, email: &str) -> String {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Whether `token` names a live session
    pub fn is_valid(&self, token: &str) -> bool {
        self.lookup_at(token, Utc::now()).is_some()
    }

    /// Get a live session by token
    pub fn get_session(&self, token: &str) -> Option<Session> {
        self.lookup_at(token, Utc::now())
    }

    /// Delete a session; returns whether a live one existed
    pub fn revoke(&self, token: &str) -> bool {
        self.revoke_at(token, Utc::now())
    }

    /// Remove every expired session and return how many were removed
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Number of sessions in the table, including expired ones not yet evicted
    pub fn active_sessions(&self) -> usize {
        self.table.len()
    }

    /// Run [`Self::sweep_expired`] every `period` on the tokio runtime
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = manager.sweep_expired();
                if removed > 0 {
                    tracing::info!(
                        removed,
                        remaining = manager.active_sessions(),
                        "swept expired sessions"
                    );
                }
            }
        })
    }

    fn issue_at(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> String {
        let token = generate_session_token();
        let session = Session {
            user_id,
            email: email.to_string(),
            login_time: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.table.entries.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.table.len() as f64);
        tracing::info!(user_id, "session issued");

        token
    }

    fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        // clone out so the shard guard is released before any removal
        let session = self.table.entries.get(token)?.value().clone();
        if session.is_expired_at(now) {
            if self
                .table
                .entries
                .remove_if(token, |_, s| s.is_expired_at(now))
                .is_some()
            {
                counter!(SESSION_EXPIRED).increment(1);
                gauge!(SESSION_ACTIVE).set(self.table.len() as f64);
                tracing::debug!(user_id = session.user_id, "session expired");
            }
            return None;
        }
        Some(session)
    }

    fn revoke_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let Some((_, session)) = self.table.entries.remove(token) else {
            return false;
        };
        gauge!(SESSION_ACTIVE).set(self.table.len() as f64);

        if session.is_expired_at(now) {
            counter!(SESSION_EXPIRED).increment(1);
            return false;
        }
        counter!(SESSION_REVOKED).increment(1);
        tracing::info!(user_id = session.user_id, "session revoked");
        true
    }

    fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.table.entries.retain(|_, session| {
            let keep = !session.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(self.table.len() as f64);
        }
        removed
    }
}
