//! Session state machine
//!
//! `SessionMachine` is the single owner of the session. Consumers read
//! snapshots and subscribe to events; only the transition methods here
//! mutate it.
//!
//! Every transition runs "persist, then commit" under one async mutex, so
//! transitions never interleave and memory is never ahead of storage.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{debug, info};

use super::state::{
    AuthSource, Credentials, SessionEpoch, SessionEvent, SessionSnapshot, SessionState,
};
use crate::error::SessionError;
use crate::store::{PersistedSession, SessionStore};

/// Capacity of the event channel; slow subscribers see `Lagged` and can
/// recover from the latest snapshot
const EVENT_CAPACITY: usize = 32;

pub struct SessionMachine {
    store: Arc<dyn SessionStore>,
    /// Serializes transitions
    transition: Mutex<()>,
    /// Latest committed snapshot
    state_tx: watch::Sender<SessionSnapshot>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionMachine {
    /// Create an anonymous session backed by `store`
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state_tx, _) = watch::channel(SessionSnapshot::default());
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            transition: Mutex::new(()),
            state_tx,
            event_tx,
        }
    }

    /// Latest committed value; never waits on an in-progress transition
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state_tx.borrow().is_logged_in()
    }

    /// Subscribe to transition events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the latest snapshot
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Credentials returned by a successful login request
    pub async fn login(&self, credentials: Credentials) -> Result<(), SessionError> {
        self.authenticate(AuthSource::Login, credentials).await
    }

    /// Credentials returned by a successful signup request
    pub async fn register(&self, credentials: Credentials) -> Result<(), SessionError> {
        self.authenticate(AuthSource::Register, credentials).await
    }

    /// Credentials re-hydrated from the persistent store
    pub async fn restore(&self, credentials: Credentials) -> Result<(), SessionError> {
        self.authenticate(AuthSource::Restore, credentials).await
    }

    /// Enter (or re-enter) `Authenticated` unconditionally
    pub async fn authenticate(
        &self,
        source: AuthSource,
        credentials: Credentials,
    ) -> Result<(), SessionError> {
        self.commit_authenticated(source, credentials, None)
            .await
            .map(|_| ())
    }

    /// Enter `Authenticated` only if no transition happened since `issued_at`
    ///
    /// Returns `Ok(false)` when the result is stale and was discarded. Used
    /// for network responses that may land after a logout.
    pub async fn authenticate_if_current(
        &self,
        issued_at: SessionEpoch,
        source: AuthSource,
        credentials: Credentials,
    ) -> Result<bool, SessionError> {
        self.commit_authenticated(source, credentials, Some(issued_at))
            .await
    }

    /// Return to `Anonymous` and clear the store
    ///
    /// Idempotent: when already anonymous nothing is written and `Ok(false)`
    /// is returned.
    pub async fn logout(&self) -> Result<bool, SessionError> {
        let _guard = self.transition.lock().await;
        let current = self.snapshot();
        if !current.is_logged_in() {
            debug!("Logout while anonymous, nothing to do");
            return Ok(false);
        }

        self.store.clear().await?;

        let next = SessionSnapshot::new(SessionState::Anonymous, current.epoch().next());
        self.state_tx.send_replace(next);
        info!(user_id = ?current.user_id(), "Session ended");
        let _ = self.event_tx.send(SessionEvent::LoggedOut { at: Utc::now() });
        Ok(true)
    }

    async fn commit_authenticated(
        &self,
        source: AuthSource,
        credentials: Credentials,
        issued_at: Option<SessionEpoch>,
    ) -> Result<bool, SessionError> {
        let _guard = self.transition.lock().await;
        let current = self.snapshot();
        if let Some(issued_at) = issued_at
            && issued_at != current.epoch()
        {
            debug!(
                %source,
                issued_at = issued_at.value(),
                current = current.epoch().value(),
                "Discarding stale credentials"
            );
            return Ok(false);
        }

        self.store
            .save(&PersistedSession::from(&credentials))
            .await?;

        let user_id = credentials.user_id().to_string();
        let next = SessionSnapshot::new(
            SessionState::Authenticated(credentials),
            current.epoch().next(),
        );
        self.state_tx.send_replace(next);
        info!(%source, %user_id, "Session authenticated");
        let _ = self.event_tx.send(SessionEvent::Authenticated {
            user_id,
            source,
            at: Utc::now(),
        });
        Ok(true)
    }
}
