//! Per-account exclusive locks.
//!
//! The store keeps one async mutex per account id. A unit of work that wants
//! to mutate a balance must acquire the account's mutex first and hold it
//! until commit or abort; this is the only mutual-exclusion mechanism in the
//! system. Lock acquisition is bounded by a timeout so a stuck unit of work
//! cannot wedge its peers forever; the timeout surfaces as an error that
//! aborts the waiting unit of work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use coin_shop_core::AccountId;

use crate::error::{Result, StoreError};

/// Default bound on how long a unit of work waits for a contended lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Registry of per-account mutexes.
///
/// Entries are created on first contention for an account and retained for
/// the life of the store; the registry is bounded by the number of accounts
/// ever touched, which is acceptable for this workload.
pub(crate) struct AccountLocks {
    inner: Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Clone the lock handle for an account, creating it if needed.
    fn handle(&self, id: AccountId) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(id).or_default())
    }

    /// Acquire the exclusive lock for an account, waiting at most `timeout`.
    pub(crate) async fn acquire(
        &self,
        id: AccountId,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<()>> {
        let handle = self.handle(id);
        tokio::time::timeout(timeout, handle.lock_owned())
            .await
            .map_err(|_| StoreError::LockTimeout {
                target: format!("account {id}"),
            })
    }
}
