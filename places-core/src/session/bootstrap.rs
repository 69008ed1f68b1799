//! Startup re-hydration of the session
//!
//! A stored token is trusted as-is: no expiry check and no validation call.
//! It stays in use until a request is rejected by the server.

use std::sync::Arc;

use tracing::{info, warn};

use super::machine::SessionMachine;
use crate::store::SessionStore;

/// What the bootstrapper found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A stored session was restored
    Restored { user_id: String },
    /// No usable record; the session stays anonymous
    Anonymous,
    /// The store could not be used; the session stays anonymous
    Unavailable { reason: String },
}

/// Seeds the state machine from the persistent store
///
/// `run` consumes the bootstrapper, so a process root that owns a single
/// instance restores at most once.
pub struct Bootstrapper {
    store: Arc<dyn SessionStore>,
}

impl Bootstrapper {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Read the store and restore the session if a token is present
    ///
    /// Never fails: storage problems leave the session anonymous.
    pub async fn run(self, machine: &SessionMachine) -> BootstrapOutcome {
        let record = match self.store.load().await {
            Ok(record) => record,
            Err(e) => {
                warn!("Session store unreadable, starting anonymous: {}", e);
                return BootstrapOutcome::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        let Some(credentials) = record.and_then(|r| r.into_credentials()) else {
            info!("No stored session");
            return BootstrapOutcome::Anonymous;
        };

        let user_id = credentials.user_id().to_string();
        match machine.restore(credentials).await {
            Ok(()) => BootstrapOutcome::Restored { user_id },
            Err(e) => {
                warn!("Failed to restore stored session: {}", e);
                BootstrapOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
