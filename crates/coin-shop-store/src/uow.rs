//! The unit of work: one atomic, all-or-nothing group of reads and writes.
//!
//! A [`UnitOfWork`] is a capability value: every store operation that must be
//! atomic with its peers takes the same unit of work and stages its writes
//! into the shared batch. Nothing touches the database until
//! [`commit`](crate::RocksStore::commit) writes the whole batch in one call.
//! Dropping the unit of work without committing aborts it: staged writes are
//! discarded and all held locks release.

use rocksdb::WriteBatch;
use tokio::sync::OwnedMutexGuard;

use coin_shop_core::AccountId;

/// An open atomic unit of work against the store.
///
/// Holds the staged write batch plus every lock guard acquired on its behalf:
/// per-account exclusive locks from lock-reads and, for account creation, the
/// store-wide creation lock. Guards release when the unit of work is consumed
/// by commit or dropped on abort, never earlier, so a committed balance can
/// not be overwritten from a stale read.
pub struct UnitOfWork {
    pub(crate) batch: WriteBatch,
    guards: Vec<OwnedMutexGuard<()>>,
    locked: Vec<AccountId>,
}

impl UnitOfWork {
    pub(crate) fn new() -> Self {
        Self {
            batch: WriteBatch::default(),
            guards: Vec::new(),
            locked: Vec::new(),
        }
    }

    /// Park an account lock guard in this unit of work.
    ///
    /// Account locks must be acquired in strictly ascending id order; that
    /// single rule is what makes cycles between concurrent units of work
    /// impossible.
    pub(crate) fn hold_account_lock(&mut self, id: AccountId, guard: OwnedMutexGuard<()>) {
        debug_assert!(
            self.locked.last().map_or(true, |last| *last < id),
            "account locks must be acquired in ascending id order"
        );
        self.locked.push(id);
        self.guards.push(guard);
    }

    /// Park a non-account guard (the creation lock) in this unit of work.
    pub(crate) fn hold_guard(&mut self, guard: OwnedMutexGuard<()>) {
        self.guards.push(guard);
    }

    /// Accounts whose exclusive locks this unit of work holds.
    #[must_use]
    pub fn locked_accounts(&self) -> &[AccountId] {
        &self.locked
    }

    pub(crate) fn into_parts(self) -> (WriteBatch, Vec<OwnedMutexGuard<()>>) {
        (self.batch, self.guards)
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("staged_writes", &self.batch.len())
            .field("locked_accounts", &self.locked)
            .finish()
    }
}
