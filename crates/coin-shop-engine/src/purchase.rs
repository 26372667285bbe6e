//! The purchase engine: atomic debit of a buyer against a catalog item.

use std::sync::Arc;

use coin_shop_core::{AccountId, MerchItem, Purchase};
use coin_shop_store::RocksStore;

use crate::error::{EngineError, Result};

/// Orchestrates the atomic "resolve item, debit buyer, append purchase
/// record" operation.
///
/// The catalog lookup happens before any unit of work is opened: the price
/// written into the purchase record is a snapshot, so the item row needs no
/// lock. The buyer's balance is lock-read in the same unit of work that
/// stages the debit and the audit record.
#[derive(Clone)]
pub struct PurchaseEngine {
    store: Arc<RocksStore>,
}

impl PurchaseEngine {
    /// Create a new purchase engine over the given store.
    #[must_use]
    pub fn new(store: Arc<RocksStore>) -> Self {
        Self { store }
    }

    /// Purchase the named item for `buyer_id`.
    ///
    /// On success exactly one [`Purchase`] record is committed together with
    /// the buyer's balance debit. On any error the unit of work aborts and
    /// no partial mutation is observable.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ItemNotFound`] if the catalog has no such item
    ///   (checked before any unit of work is opened).
    /// - [`EngineError::AccountNotFound`] if the buyer does not exist.
    /// - [`EngineError::InsufficientCoins`] if the buyer cannot cover the
    ///   price.
    /// - [`EngineError::Store`] on storage, lock-timeout, or commit failure.
    pub async fn purchase(&self, buyer_id: AccountId, item_name: &str) -> Result<Purchase> {
        let item = self
            .store
            .get_merch_item(item_name)?
            .ok_or_else(|| EngineError::ItemNotFound {
                name: item_name.to_string(),
            })?;

        let mut uow = self.store.begin_unit_of_work();

        let mut buyer = self
            .store
            .get_account_for_update(&mut uow, buyer_id)
            .await
            .map_err(EngineError::from_account_lookup)?;

        if !buyer.has_sufficient_coins(item.price) {
            return Err(EngineError::InsufficientCoins {
                balance: buyer.balance,
                required: item.price,
            });
        }

        buyer.balance -= item.price;
        self.store.update_account(&mut uow, &buyer)?;
        let record = self
            .store
            .append_purchase(&mut uow, buyer_id, &item.name, item.price)?;
        self.store.commit(uow)?;

        tracing::info!(
            purchase_id = %record.id,
            buyer_id = %buyer_id,
            item = %record.item,
            price = record.price,
            "item purchased"
        );

        Ok(record)
    }

    /// List purchases made by an account, newest first. Non-locking read.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn purchases(&self, buyer_id: AccountId) -> Result<Vec<Purchase>> {
        Ok(self.store.list_purchases_by_buyer(buyer_id)?)
    }

    /// List the full catalog, ordered by item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn catalog(&self) -> Result<Vec<MerchItem>> {
        Ok(self.store.list_merch_items()?)
    }
}
