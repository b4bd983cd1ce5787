//! The admin session lifecycle.
//!
//! A session is created by a successful credential check, persisted as one
//! JSON object under the `admin_session` key, and stays valid only while it
//! is younger than the maximum age *and* the user has been active within
//! the idle timeout. Validity is a pure function of `(now, session)`;
//! [`SessionContext`] wires it to a [`Clock`] and a [`SessionStore`].
//!
//! State moves `Unauthenticated → Authenticated → Expired/Unauthenticated`.
//! There is exactly one local session and the shared file is the source of
//! truth: long-running holders re-read it before every check or touch, so
//! activity and logouts from other commands are picked up.

use crate::libs::auth::{Authenticate, Identity};
use crate::libs::clock::Clock;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::role::Role;
use crate::msg_debug;
use anyhow::Result;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

pub const SESSION_STORAGE_KEY: &str = "admin_session";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionPolicy {
    pub max_age: Duration,
    pub idle_timeout: Duration,
    pub activity_min_gap: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(24),
            idle_timeout: Duration::minutes(30),
            activity_min_gap: Duration::seconds(10),
        }
    }
}

impl SessionPolicy {
    pub fn is_valid(&self, now: DateTime<Utc>, session: &AdminSession) -> bool {
        now - session.created_at < self.max_age && now - session.user.last_activity < self.idle_timeout
    }
}

/// Validity under the default 24h / 30min policy.
pub fn is_session_valid(now: DateTime<Utc>, session: &AdminSession) -> bool {
    SessionPolicy::default().is_valid(now, session)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_authenticated: bool,
    pub last_activity: DateTime<Utc>,
}

impl AdminUser {
    /// Numeric member id, `None` for the bootstrap administrator.
    pub fn member_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub id: String,
    pub user: AdminUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(identity: Identity, now: DateTime<Utc>, policy: &SessionPolicy) -> Self {
        Self {
            id: format!("session_{}_{:016x}", now.timestamp_millis(), OsRng.next_u64()),
            user: AdminUser {
                id: identity.id,
                email: identity.email,
                name: identity.name,
                role: identity.role,
                is_authenticated: true,
                last_activity: now,
            },
            created_at: now,
            expires_at: now + policy.max_age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    /// The held session failed a validity check and was discarded.
    Expired,
}

/// Where the serialized session lives between runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// `admin_session.json` in the data directory.
    pub fn new() -> Result<Self> {
        let path = DataStorage::new().get_path(&format!("{}.json", SESSION_STORAGE_KEY))?;
        Ok(Self { path })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save(&self, value: &str) -> Result<()> {
        fs::write(&self.path, value)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process store; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.value.lock().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.get())
    }

    fn save(&self, value: &str) -> Result<()> {
        *self.value.lock() = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.value.lock() = None;
        Ok(())
    }
}

pub struct SessionContext<S: SessionStore, C: Clock> {
    store: S,
    clock: C,
    policy: SessionPolicy,
    session: Option<AdminSession>,
    state: SessionState,
}

impl<S: SessionStore, C: Clock> SessionContext<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_policy(store, clock, SessionPolicy::default())
    }

    pub fn with_policy(store: S, clock: C, policy: SessionPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
            session: None,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&AdminSession> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AdminUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Checks the credentials and, on success, starts and persists a new session.
    ///
    /// Any failure, including an unreachable database, yields `Ok(false)` and
    /// leaves the store untouched.
    pub async fn login(&mut self, auth: &impl Authenticate, email: &str, password: &str) -> Result<bool> {
        let now = self.clock.now();
        let Some(identity) = auth.authenticate(email, password, now).await else {
            debug!(email, "credentials rejected");
            return Ok(false);
        };
        let session = AdminSession::new(identity, now, &self.policy);
        self.persist(&session)?;
        self.session = Some(session);
        self.state = SessionState::Authenticated;
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session = None;
        self.state = SessionState::Unauthenticated;
        self.store.clear()
    }

    /// Restores the persisted session if it is still valid, discarding it otherwise.
    pub fn check_session(&mut self) -> Result<SessionState> {
        let Some(raw) = self.store.load()? else {
            self.session = None;
            self.state = SessionState::Unauthenticated;
            return Ok(self.state);
        };

        let session: AdminSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!("{}: {}", Message::SessionDiscarded, e);
                self.logout()?;
                return Ok(self.state);
            }
        };

        if self.policy.is_valid(self.clock.now(), &session) {
            self.session = Some(session);
            self.state = SessionState::Authenticated;
        } else {
            msg_debug!(Message::SessionExpired);
            self.expire()?;
        }
        Ok(self.state)
    }

    /// Moves `lastActivity` to now, at most once per minimum gap.
    ///
    /// Returns whether a touch was recorded. The persisted session is read
    /// first: a logout elsewhere is never undone, and an expired session is
    /// logged out instead of being revived.
    pub fn update_user_activity(&mut self) -> Result<bool> {
        self.reload()?;
        let now = self.clock.now();
        let Some(session) = self.session.as_ref() else {
            return Ok(false);
        };
        if !self.policy.is_valid(now, session) {
            self.expire()?;
            return Ok(false);
        }
        if now - session.user.last_activity < self.policy.activity_min_gap {
            return Ok(false);
        }

        let mut session = session.clone();
        session.user.last_activity = now;
        self.persist(&session)?;
        self.session = Some(session);
        Ok(true)
    }

    /// Periodic validity check; returns `true` when the held session ended,
    /// either by expiring or by a logout from another process.
    pub fn tick(&mut self) -> Result<bool> {
        let held = self.session.is_some();
        self.reload()?;
        let now = self.clock.now();
        let Some(session) = self.session.as_ref() else {
            return Ok(held);
        };
        if !self.policy.is_valid(now, session) {
            self.expire()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Brings the held session in line with the store, which other commands
    /// write to. An empty store means someone logged out. For the same
    /// session the later `lastActivity` wins.
    fn reload(&mut self) -> Result<()> {
        let Some(held) = self.session.take() else {
            return Ok(());
        };
        let stored = match self.store.load()? {
            Some(raw) => match serde_json::from_str::<AdminSession>(&raw) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!("{}: {}", Message::SessionDiscarded, e);
                    self.store.clear()?;
                    None
                }
            },
            None => None,
        };

        match stored {
            Some(mut stored) => {
                if stored.id == held.id && held.user.last_activity > stored.user.last_activity {
                    stored.user.last_activity = held.user.last_activity;
                }
                self.session = Some(stored);
            }
            None => {
                debug!(session = %held.id, "session no longer persisted");
                self.state = SessionState::Unauthenticated;
            }
        }
        Ok(())
    }

    fn expire(&mut self) -> Result<()> {
        self.session = None;
        self.state = SessionState::Expired;
        self.store.clear()
    }

    fn persist(&self, session: &AdminSession) -> Result<()> {
        self.store.save(&serde_json::to_string(session)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_at(created: DateTime<Utc>, last_activity: DateTime<Utc>) -> AdminSession {
        let identity = Identity {
            id: "7".to_string(),
            email: "kim@example.com".to_string(),
            name: "Kim".to_string(),
            role: Role::Employee,
        };
        let mut session = AdminSession::new(identity, created, &SessionPolicy::default());
        session.user.last_activity = last_activity;
        session
    }

    #[test]
    fn validity_boundaries() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let session = session_at(start, start);
        assert!(is_session_valid(start + Duration::minutes(29), &session));
        assert!(!is_session_valid(start + Duration::minutes(30), &session));

        let active = session_at(start, start + Duration::hours(24) - Duration::minutes(1));
        assert!(is_session_valid(start + Duration::hours(24) - Duration::seconds(1), &active));
        assert!(!is_session_valid(start + Duration::hours(24), &active));
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let value = serde_json::to_value(session_at(start, start)).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("expiresAt").is_some());
        assert_eq!(value["user"]["isAuthenticated"], true);
        assert_eq!(value["user"]["role"], "employee");
        assert!(value["id"].as_str().unwrap().starts_with("session_"));
    }

    #[test]
    fn member_id_is_numeric_only() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let mut session = session_at(start, start);
        assert_eq!(session.user.member_id(), Some(7));
        session.user.id = "admin".to_string();
        assert_eq!(session.user.member_id(), None);
    }
}
