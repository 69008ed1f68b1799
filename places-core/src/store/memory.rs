//! In-process session slot

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PersistedSession, SessionStore};
use crate::error::StoreError;

/// Non-durable store, useful for tests and for embedders that opt out of
/// persistence. Counts every mutating call.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<PersistedSession>>,
    writes: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record, as if left by an earlier process
    pub fn with_record(session: PersistedSession) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `save` + `clear` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Option<PersistedSession> {
        self.slot.read().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<PersistedSession>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        *self.slot.write().await = Some(session.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_writes() {
        let store = MemorySessionStore::new();
        store
            .save(&PersistedSession {
                user_id: "u1".into(),
                token: "t1".into(),
            })
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeded_store_loads_record() {
        let store = MemorySessionStore::with_record(PersistedSession {
            user_id: "u1".into(),
            token: "t1".into(),
        });
        assert_eq!(store.load().await.unwrap().unwrap().user_id, "u1");
        assert_eq!(store.write_count(), 0);
    }
}
