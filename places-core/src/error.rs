//! Error types for places-core

use thiserror::Error;

/// Message shown when the server rejects a request without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again.";

/// Top-level error type for places-core
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from a network-bound operation
///
/// `Display` yields exactly the text a user should see, so call sites can
/// put `err.to_string()` straight into an error dialog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Network unreachable or response body could not be decoded
    #[error("{0}")]
    Transport(String),

    /// Server answered with a status outside 2xx
    #[error("{message}")]
    Application { status: u16, message: String },

    /// The controller already has a request in flight
    #[error("A request is already in progress")]
    Busy,

    /// The owning consumer was dropped before completion
    #[error("Request cancelled")]
    Cancelled,

    /// An authenticated call site was invoked without a session
    #[error("You must be logged in to do that.")]
    Unauthenticated,
}

impl RequestError {
    /// Build an application error, falling back to the generic message
    /// when the server supplied none (or an empty one)
    pub fn application(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Self::Application { status, message }
    }

    /// True if the outcome must not be recorded into consumer state
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors from the persistent session store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read session: {0}")]
    Read(String),

    #[error("failed to write session: {0}")]
    Write(String),

    #[error("failed to serialize session: {0}")]
    Serialize(String),
}

/// Errors surfaced by session transitions
///
/// The state machine decides nothing on its own; the only failures it can
/// report are storage failures, after which the in-memory state is unchanged.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from client configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid URL for {key}: {value} ({reason})")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}
