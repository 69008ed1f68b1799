//! Request lifecycle controller
//!
//! One controller per call site. It tracks `is_loading`, `error` and
//! `last_result` for the operation it runs:
//!
//! ```text
//! idle ──send──▶ loading ──▶ last_result set   (2xx, body decoded)
//!                        └─▶ error set         (non-2xx, transport failure)
//! ```
//!
//! A second `send` while loading is rejected with [`RequestError::Busy`].
//! Results are applied only while the owner is live; once the owner is
//! dropped the in-flight request is abandoned and nothing is written.
//! Dropping a `send` future while the owner is live (a timeout, say) ends
//! the dispatch with `Cancelled` recorded.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::owner::OwnerToken;
use super::transport::{ApiRequest, RawResponse, Transport};
use crate::error::RequestError;

/// Lifecycle state of one call site
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_result: Option<T>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: None,
            last_result: None,
        }
    }
}

/// Executes requests and records their outcome
///
/// Cloning yields another handle to the same state, so a view can keep
/// reading while a spawned task drives `send`.
pub struct RequestController<T> {
    transport: Arc<dyn Transport>,
    owner: OwnerToken,
    state: Arc<RwLock<RequestState<T>>>,
}

impl<T> Clone for RequestController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            owner: self.owner.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> RequestController<T> {
    pub fn new(transport: Arc<dyn Transport>, owner: OwnerToken) -> Self {
        Self {
            transport,
            owner,
            state: Arc::new(RwLock::new(RequestState::default())),
        }
    }

    pub fn owner(&self) -> &OwnerToken {
        &self.owner
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Dismiss the current error; loading flag and result are untouched
    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Record a failure decided before reaching the network
    ///
    /// Returns the error so call sites can `return Err(controller.reject(e))`.
    pub fn reject(&self, error: RequestError) -> RequestError {
        if self.owner.is_live() {
            let mut state = self.write();
            if !state.is_loading {
                state.error = Some(error.to_string());
                state.last_result = None;
            }
        }
        error
    }

    fn read(&self) -> RwLockReadGuard<'_, RequestState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RequestState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark loading; fails if a request is already in flight
    fn begin(&self) -> Result<(), RequestError> {
        let mut state = self.write();
        if state.is_loading {
            return Err(RequestError::Busy);
        }
        state.is_loading = true;
        state.error = None;
        state.last_result = None;
        Ok(())
    }
}

impl<T: Clone> RequestController<T> {
    pub fn state(&self) -> RequestState<T> {
        self.read().clone()
    }

    pub fn last_result(&self) -> Option<T> {
        self.read().last_result.clone()
    }
}

impl<T> RequestController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Dispatch `request` and record the outcome
    ///
    /// The decoded payload (or the failure) is also returned to the caller,
    /// which decides on follow-up effects such as authenticating the session.
    pub async fn send(&self, request: ApiRequest) -> Result<T, RequestError> {
        if !self.owner.is_live() {
            return Err(RequestError::Cancelled);
        }
        self.begin()?;
        let in_flight = InFlight { controller: self };

        debug!(
            owner = self.owner.label(),
            method = %request.method,
            url = %request.url,
            "Dispatching request"
        );

        let outcome = tokio::select! {
            biased;
            _ = self.owner.discarded() => Err(RequestError::Cancelled),
            response = self.transport.execute(request) => response.and_then(decode::<T>),
        };

        std::mem::forget(in_flight);
        self.apply(outcome)
    }

    /// Write the outcome unless the owner is gone
    fn apply(&self, outcome: Result<T, RequestError>) -> Result<T, RequestError> {
        if !self.owner.is_live() || matches!(outcome, Err(RequestError::Cancelled)) {
            debug!(owner = self.owner.label(), "Owner discarded, dropping result");
            return Err(RequestError::Cancelled);
        }

        let mut state = self.write();
        state.is_loading = false;
        match &outcome {
            Ok(value) => state.last_result = Some(value.clone()),
            Err(e) => state.error = Some(e.to_string()),
        }
        outcome
    }
}

/// Settles the controller when a `send` future is dropped mid-flight
///
/// A dropped future (timeout, losing `select!` branch, aborted task) ends
/// the dispatch with `Cancelled` recorded, so the controller can dispatch
/// again. A discarded owner's state is left untouched.
struct InFlight<'a, T> {
    controller: &'a RequestController<T>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.controller.owner.is_live() {
            return;
        }
        debug!(
            owner = self.controller.owner.label(),
            "Request dropped before completion"
        );
        let mut state = self.controller.write();
        state.is_loading = false;
        state.error = Some(RequestError::Cancelled.to_string());
    }
}

/// Interpret a raw response
///
/// The body is parsed before the status is looked at: an undecodable body
/// is a transport failure whatever the status. Non-2xx responses surface
/// their `message` field, or the generic fallback.
pub(crate) fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T, RequestError> {
    let value: Value = if response.body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&response.body)
            .map_err(|e| RequestError::Transport(format!("invalid response body: {e}")))?
    };

    if !response.is_success() {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(RequestError::application(response.status, message));
    }

    serde_json::from_value(value)
        .map_err(|e| RequestError::Transport(format!("unexpected response shape: {e}")))
}
