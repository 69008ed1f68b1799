//! Persistent session store
//!
//! One durable slot holding the last-known credential. Written only by the
//! session state machine's transitions, read only by the bootstrapper.

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::session::Credentials;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// The durable record: `{ "userId": ..., "token": ... }`
///
/// A record without a `token` field deserializes with an empty token, which
/// [`PersistedSession::into_credentials`] reports as "no session".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub token: String,
}

impl PersistedSession {
    /// Credentials worth restoring, if the record carries a token
    pub fn into_credentials(self) -> Option<Credentials> {
        if self.token.is_empty() {
            None
        } else {
            Some(Credentials::new(self.user_id, self.token))
        }
    }
}

impl From<&Credentials> for PersistedSession {
    fn from(credentials: &Credentials) -> Self {
        Self {
            user_id: credentials.user_id().to_string(),
            token: credentials.token().to_string(),
        }
    }
}

/// Durable key-value slot for the session
///
/// `save` and `clear` must be complete (observable by a later `load`, even
/// in another process) when they return `Ok`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the slot; `None` when absent
    async fn load(&self) -> Result<Option<PersistedSession>, StoreError>;

    /// Replace the slot atomically
    async fn save(&self, session: &PersistedSession) -> Result<(), StoreError>;

    /// Remove the slot; clearing an absent slot is not an error
    async fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = PersistedSession {
            user_id: "u1".into(),
            token: "t1".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"userId":"u1","token":"t1"}"#);
    }

    #[test]
    fn test_record_without_token_is_no_session() {
        let record: PersistedSession = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert!(record.into_credentials().is_none());
    }

    #[test]
    fn test_record_with_token_yields_credentials() {
        let record: PersistedSession =
            serde_json::from_str(r#"{"userId":"u1","token":"t1"}"#).unwrap();
        let credentials = record.into_credentials().unwrap();
        assert_eq!(credentials.user_id(), "u1");
        assert_eq!(credentials.token(), "t1");
    }
}
