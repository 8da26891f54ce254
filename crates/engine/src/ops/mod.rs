use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

mod access;
mod recalc;
mod records;
mod staff;
mod stores;

pub use recalc::{RecalculatedRecord, RecalculationResult};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Per-store mutual exclusion.
///
/// Two concurrent mutations against the same store must not interleave their
/// read-modify-write of the cash chain; mutations against different stores
/// are independent. The registry holds no ledger data, only ordering.
#[derive(Debug, Default)]
struct StoreLocks {
    inner: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl StoreLocks {
    async fn acquire(&self, store_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(store_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Evicts a store's entry so deleted stores do not pin a mutex for the
    /// process lifetime. Tasks already holding a clone of the `Arc` keep it
    /// alive until they release their guard.
    fn release(&self, store_id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.remove(&store_id);
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    store_locks: StoreLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) async fn lock_store(&self, store_id: Uuid) -> OwnedMutexGuard<()> {
        self.store_locks.acquire(store_id).await
    }

    pub(crate) fn release_store_lock(&self, store_id: Uuid) {
        self.store_locks.release(store_id);
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            store_locks: StoreLocks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_locks_evict_released_entries() {
        let locks = StoreLocks::default();
        let store_id = Uuid::new_v4();

        let guard = locks.acquire(store_id).await;
        assert_eq!(locks.inner.lock().unwrap().len(), 1);
        drop(guard);

        locks.release(store_id);
        assert!(locks.inner.lock().unwrap().is_empty());

        // A fresh acquire after eviction starts a new entry.
        let _guard = locks.acquire(store_id).await;
        assert_eq!(locks.inner.lock().unwrap().len(), 1);
    }
}
