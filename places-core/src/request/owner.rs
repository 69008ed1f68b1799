//! Owner tokens: which consumer issued a request
//!
//! A view (or any consumer) holds an [`Owner`]. Controllers created from it
//! carry an [`OwnerToken`]. Dropping the owner cancels the token; in-flight
//! requests stop and late results are never applied.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use super::controller::RequestController;
use super::transport::Transport;

/// A consumer whose lifetime scopes its requests
pub struct Owner {
    token: OwnerToken,
    _guard: DropGuard,
}

impl Owner {
    /// New live owner; `label` is used in logs only
    pub fn new(label: impl Into<String>) -> Self {
        let cancel = CancellationToken::new();
        let token = OwnerToken {
            id: Uuid::new_v4(),
            label: Arc::from(label.into()),
            cancel: cancel.clone(),
        };
        Self {
            token,
            _guard: cancel.drop_guard(),
        }
    }

    pub fn token(&self) -> OwnerToken {
        self.token.clone()
    }

    /// A controller whose results are dropped once this owner is gone
    pub fn controller<T>(&self, transport: Arc<dyn Transport>) -> RequestController<T> {
        RequestController::new(transport, self.token())
    }

    /// Discard the owner now (same as dropping it)
    pub fn discard(self) {}
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner").field("token", &self.token).finish()
    }
}

/// Cloneable handle checked before applying results
#[derive(Clone)]
pub struct OwnerToken {
    id: Uuid,
    label: Arc<str>,
    cancel: CancellationToken,
}

impl OwnerToken {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// False once the owner has been dropped
    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Completes when the owner is dropped
    pub async fn discarded(&self) {
        self.cancel.cancelled().await;
    }
}

impl fmt::Debug for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerToken")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("live", &self.is_live())
            .finish()
    }
}
