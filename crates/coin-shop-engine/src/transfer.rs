//! The transfer engine: atomic coin movement between two accounts.

use std::sync::Arc;

use coin_shop_core::{AccountId, CoinTransfer};
use coin_shop_store::RocksStore;

use crate::error::{EngineError, Result};

/// Orchestrates the atomic "debit sender, credit recipient, append audit
/// record" operation.
///
/// Concurrency safety comes entirely from the store's per-account exclusive
/// locks: both balances are lock-read in the same unit of work that later
/// writes them, so a concurrent transfer can neither observe a stale balance
/// nor overwrite a committed one. Locks are always acquired in ascending
/// account-id order, independent of which side is the sender, so two
/// opposing transfers between the same pair queue instead of deadlocking.
#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<RocksStore>,
}

impl TransferEngine {
    /// Create a new transfer engine over the given store.
    #[must_use]
    pub fn new(store: Arc<RocksStore>) -> Self {
        Self { store }
    }

    /// Transfer `amount` coins from `sender_id` to `recipient_id`.
    ///
    /// On success exactly one [`CoinTransfer`] record is committed together
    /// with both balance updates. On any error the unit of work aborts and
    /// no partial mutation is observable.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if `amount <= 0` (checked before any
    ///   storage access).
    /// - [`EngineError::SelfTransfer`] if sender and recipient are the same
    ///   account.
    /// - [`EngineError::AccountNotFound`] if either account does not exist.
    /// - [`EngineError::InsufficientCoins`] if the sender cannot cover the
    ///   amount.
    /// - [`EngineError::Store`] on storage, lock-timeout, or commit failure.
    pub async fn transfer(
        &self,
        sender_id: AccountId,
        recipient_id: AccountId,
        amount: i64,
    ) -> Result<CoinTransfer> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount);
        }
        if sender_id == recipient_id {
            return Err(EngineError::SelfTransfer);
        }

        let mut uow = self.store.begin_unit_of_work();

        // Lock both accounts in ascending id order, then sort out the roles.
        let (first_id, second_id) = if sender_id < recipient_id {
            (sender_id, recipient_id)
        } else {
            (recipient_id, sender_id)
        };
        let first = self
            .store
            .get_account_for_update(&mut uow, first_id)
            .await
            .map_err(EngineError::from_account_lookup)?;
        let second = self
            .store
            .get_account_for_update(&mut uow, second_id)
            .await
            .map_err(EngineError::from_account_lookup)?;
        let (mut sender, mut recipient) = if first_id == sender_id {
            (first, second)
        } else {
            (second, first)
        };

        if !sender.has_sufficient_coins(amount) {
            return Err(EngineError::InsufficientCoins {
                balance: sender.balance,
                required: amount,
            });
        }

        // amount > 0 and the check above make both results non-negative.
        sender.balance -= amount;
        recipient.balance += amount;

        self.store.update_account(&mut uow, &sender)?;
        self.store.update_account(&mut uow, &recipient)?;
        let record = self
            .store
            .append_transfer(&mut uow, sender_id, recipient_id, amount)?;
        self.store.commit(uow)?;

        tracing::info!(
            transfer_id = %record.id,
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            amount,
            "coins transferred"
        );

        Ok(record)
    }

    /// List transfers sent by an account, newest first. Non-locking read.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn sent(&self, account_id: AccountId) -> Result<Vec<CoinTransfer>> {
        Ok(self.store.list_transfers_by_sender(account_id)?)
    }

    /// List transfers received by an account, newest first. Non-locking read.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn received(&self, account_id: AccountId) -> Result<Vec<CoinTransfer>> {
        Ok(self.store.list_transfers_by_recipient(account_id)?)
    }
}
