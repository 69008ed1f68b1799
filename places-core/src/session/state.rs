//! Session state types
//!
//! `SessionState` is either anonymous or carries both a user id and a
//! token; there is no way to hold one without the other.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User id plus bearer token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    user_id: String,
    token: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Tokens stay out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Coarse session status, the input of the route gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// Authoritative session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Credentials),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Authenticated(credentials) => Some(credentials),
            Self::Anonymous => None,
        }
    }
}

/// Monotonic counter bumped by every committed transition
///
/// A call site captures the epoch before issuing a session-mutating request;
/// if the epoch moved by the time the response arrives, the result is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Latest committed session value as seen by a consumer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    state: SessionState,
    epoch: SessionEpoch,
}

impl SessionSnapshot {
    pub(crate) fn new(state: SessionState, epoch: SessionEpoch) -> Self {
        Self { state, epoch }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn user_id(&self) -> Option<&str> {
        self.state.credentials().map(Credentials::user_id)
    }

    pub fn token(&self) -> Option<&str> {
        self.state.credentials().map(Credentials::token)
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// `Authorization` header value for authenticated requests
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }
}

/// Where a set of credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthSource {
    /// Network login
    Login,
    /// Network signup
    Register,
    /// Re-hydrated from the persistent store at startup
    Restore,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Restore => "restore",
        };
        f.write_str(name)
    }
}

/// Notification sent to subscribers after each committed transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Authenticated {
        user_id: String,
        source: AuthSource,
        at: DateTime<Utc>,
    },
    LoggedOut {
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Authenticated { .. } => SessionStatus::Authenticated,
            Self::LoggedOut { .. } => SessionStatus::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_anonymous() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.status(), SessionStatus::Anonymous);
        assert!(!snapshot.is_logged_in());
        assert!(snapshot.user_id().is_none());
        assert!(snapshot.token().is_none());
        assert!(snapshot.bearer().is_none());
    }

    #[test]
    fn authenticated_snapshot_exposes_both_fields() {
        let snapshot = SessionSnapshot::new(
            SessionState::Authenticated(Credentials::new("u1", "t1")),
            SessionEpoch::default().next(),
        );
        assert!(snapshot.is_logged_in());
        assert_eq!(snapshot.user_id(), Some("u1"));
        assert_eq!(snapshot.token(), Some("t1"));
        assert_eq!(snapshot.bearer().as_deref(), Some("Bearer t1"));
        assert_eq!(snapshot.epoch().value(), 1);
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let debug = format!("{:?}", Credentials::new("u1", "secret-token"));
        assert!(debug.contains("u1"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn auth_source_display() {
        assert_eq!(AuthSource::Login.to_string(), "login");
        assert_eq!(AuthSource::Register.to_string(), "register");
        assert_eq!(AuthSource::Restore.to_string(), "restore");
    }

    #[test]
    fn session_event_serializes_with_tag() {
        let event = SessionEvent::LoggedOut { at: Utc::now() };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"logged_out\""));
        assert_eq!(event.status(), SessionStatus::Anonymous);
    }
}
