//! `RocksDB` storage implementation.
//!
//! This module provides [`RocksStore`], the durable backend for accounts,
//! audit logs, and the merchandise catalog.
//!
//! # Atomicity and locking
//!
//! Mutations are staged into a [`UnitOfWork`] and land in a single
//! `WriteBatch` write at commit. Balance mutators must first lock-read the
//! account with [`RocksStore::get_account_for_update`], which acquires the
//! account's exclusive in-process lock and holds it in the unit of work until
//! commit or abort. Point-in-time reads never take locks.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use coin_shop_core::{
    Account, AccountId, CoinTransfer, MerchId, MerchItem, NewAccount, Purchase, PurchaseId,
    TransferId, DEFAULT_CATALOG, STARTING_BALANCE,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::locks::{AccountLocks, DEFAULT_LOCK_TIMEOUT};
use crate::schema::{all_column_families, cf};
use crate::uow::UnitOfWork;

type Db = DBWithThreadMode<MultiThreaded>;

/// RocksDB-backed storage for the coin shop.
pub struct RocksStore {
    db: Arc<Db>,
    locks: AccountLocks,
    create_lock: Arc<tokio::sync::Mutex<()>>,
    lock_timeout: Duration,
    next_account_id: AtomicI64,
    next_transfer_id: AtomicI64,
    next_purchase_id: AtomicI64,
    next_merch_id: StdMutex<i64>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = Db::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let store = Self {
            next_account_id: AtomicI64::new(1),
            next_transfer_id: AtomicI64::new(1),
            next_purchase_id: AtomicI64::new(1),
            next_merch_id: StdMutex::new(1),
            locks: AccountLocks::new(),
            create_lock: Arc::new(tokio::sync::Mutex::new(())),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            db: Arc::new(db),
        };
        store.init_sequences()?;
        Ok(store)
    }

    /// Override the bound on lock-acquisition waits.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Initialize identity counters from the largest persisted keys.
    fn init_sequences(&self) -> Result<()> {
        self.next_account_id
            .store(self.max_key(cf::ACCOUNTS)? + 1, Ordering::SeqCst);
        self.next_transfer_id
            .store(self.max_key(cf::TRANSFERS)? + 1, Ordering::SeqCst);
        self.next_purchase_id
            .store(self.max_key(cf::PURCHASES)? + 1, Ordering::SeqCst);

        let mut max_merch = 0;
        for item in self.list_merch_items()? {
            max_merch = max_merch.max(item.id.as_i64());
        }
        *self
            .next_merch_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = max_merch + 1;
        Ok(())
    }

    /// Largest big-endian id key in a column family, or 0 when empty.
    fn max_key(&self, cf_name: &str) -> Result<i64> {
        let cf = self.cf(cf_name)?;
        match self.db.iterator_cf(&cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&key[..8]);
                Ok(i64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    // =========================================================================
    // Unit of work
    // =========================================================================

    /// Open a new atomic unit of work.
    ///
    /// All writes and lock-reads that must be atomic together take the same
    /// unit of work. Dropping it without [`commit`](Self::commit) aborts.
    #[must_use]
    pub fn begin_unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new()
    }

    /// Commit a unit of work: write every staged mutation atomically, then
    /// release the held locks.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch write fails; nothing is persisted in
    /// that case and the locks still release.
    pub fn commit(&self, uow: UnitOfWork) -> Result<()> {
        let (batch, guards) = uow.into_parts();
        let staged = batch.len();
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        drop(guards);
        tracing::debug!(staged, "unit of work committed");
        Ok(())
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Get an account by id. Non-locking point-in-time read.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        self.db
            .get_cf(&cf, keys::account_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Get an account by username. Non-locking point-in-time read.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS_BY_USERNAME)?;
        let Some(raw) = self
            .db
            .get_cf(&cf, keys::username_key(username))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&raw[..8]);
        self.get_account(AccountId::from_be_bytes(bytes))
    }

    /// Lock-read an account for update.
    ///
    /// Acquires the account's exclusive lock (bounded by the store's lock
    /// timeout), parks the guard in the unit of work, then reads the
    /// committed record. The caller may mutate and
    /// [`update_account`](Self::update_account) the returned value; no
    /// concurrent unit of work can read or write this balance until this one
    /// commits or aborts.
    ///
    /// When locking several accounts in one unit of work, acquire them in
    /// ascending id order.
    ///
    /// # Errors
    ///
    /// - [`StoreError::LockTimeout`] if the lock cannot be acquired in time.
    /// - [`StoreError::NotFound`] if the account does not exist.
    pub async fn get_account_for_update(
        &self,
        uow: &mut UnitOfWork,
        id: AccountId,
    ) -> Result<Account> {
        let guard = self.locks.acquire(id, self.lock_timeout).await?;
        uow.hold_account_lock(id, guard);
        self.get_account(id)?
            .ok_or_else(|| StoreError::not_found("account", id))
    }

    /// Create an account: assign the next id, stage the record and username
    /// index entry, and return the populated account.
    ///
    /// Concurrent creations are serialized by a store-wide creation lock held
    /// in the unit of work until commit, so the uniqueness check cannot race.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UsernameTaken`] if the username already exists.
    /// - [`StoreError::LockTimeout`] if the creation lock is contended for
    ///   too long.
    pub async fn create_account(
        &self,
        uow: &mut UnitOfWork,
        new: NewAccount,
    ) -> Result<Account> {
        let guard = tokio::time::timeout(
            self.lock_timeout,
            Arc::clone(&self.create_lock).lock_owned(),
        )
        .await
        .map_err(|_| StoreError::LockTimeout {
            target: "account creation".into(),
        })?;
        uow.hold_guard(guard);

        if self.get_account_by_username(&new.username)?.is_some() {
            return Err(StoreError::UsernameTaken {
                username: new.username,
            });
        }

        let id = AccountId::new(self.next_account_id.fetch_add(1, Ordering::SeqCst));
        let account = Account {
            id,
            username: new.username,
            password_hash: new.password_hash,
            balance: STARTING_BALANCE,
            created_at: chrono::Utc::now(),
        };

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_by_username = self.cf(cf::ACCOUNTS_BY_USERNAME)?;
        uow.batch
            .put_cf(&cf_accounts, keys::account_key(id), Self::serialize(&account)?);
        uow.batch.put_cf(
            &cf_by_username,
            keys::username_key(&account.username),
            keys::account_key(id),
        );

        Ok(account)
    }

    /// Stage a full-row overwrite of an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the account does not currently
    /// exist; a consistency check, not an expected path.
    pub fn update_account(&self, uow: &mut UnitOfWork, account: &Account) -> Result<()> {
        if self.get_account(account.id)?.is_none() {
            return Err(StoreError::not_found("account", account.id));
        }
        let cf = self.cf(cf::ACCOUNTS)?;
        uow.batch.put_cf(
            &cf,
            keys::account_key(account.id),
            Self::serialize(account)?,
        );
        Ok(())
    }

    // =========================================================================
    // Transfer Log
    // =========================================================================

    /// Stage a transfer record plus both actor index entries; assigns the id
    /// and timestamp and returns the record.
    ///
    /// Must share the unit of work with the balance updates it documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn append_transfer(
        &self,
        uow: &mut UnitOfWork,
        sender_id: AccountId,
        recipient_id: AccountId,
        amount: i64,
    ) -> Result<CoinTransfer> {
        let id = TransferId::new(self.next_transfer_id.fetch_add(1, Ordering::SeqCst));
        let record = CoinTransfer {
            id,
            sender_id,
            recipient_id,
            amount,
            created_at: chrono::Utc::now(),
        };

        let cf_transfers = self.cf(cf::TRANSFERS)?;
        let cf_by_sender = self.cf(cf::TRANSFERS_BY_SENDER)?;
        let cf_by_recipient = self.cf(cf::TRANSFERS_BY_RECIPIENT)?;

        uow.batch
            .put_cf(&cf_transfers, keys::transfer_key(id), Self::serialize(&record)?);
        uow.batch
            .put_cf(&cf_by_sender, keys::actor_transfer_key(sender_id, id), []);
        uow.batch.put_cf(
            &cf_by_recipient,
            keys::actor_transfer_key(recipient_id, id),
            [],
        );

        Ok(record)
    }

    fn get_transfer(&self, id: TransferId) -> Result<Option<CoinTransfer>> {
        let cf = self.cf(cf::TRANSFERS)?;
        self.db
            .get_cf(&cf, keys::transfer_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// List transfers sent by an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_transfers_by_sender(&self, sender_id: AccountId) -> Result<Vec<CoinTransfer>> {
        self.list_transfers(cf::TRANSFERS_BY_SENDER, sender_id)
    }

    /// List transfers received by an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_transfers_by_recipient(
        &self,
        recipient_id: AccountId,
    ) -> Result<Vec<CoinTransfer>> {
        self.list_transfers(cf::TRANSFERS_BY_RECIPIENT, recipient_id)
    }

    fn list_transfers(&self, index_cf: &str, actor: AccountId) -> Result<Vec<CoinTransfer>> {
        let mut transfers = Vec::new();
        for key in self.scan_actor_index(index_cf, actor)? {
            let id = keys::extract_transfer_id(&key);
            if let Some(record) = self.get_transfer(id)? {
                transfers.push(record);
            }
        }
        Ok(transfers)
    }

    // =========================================================================
    // Purchase Log
    // =========================================================================

    /// Stage a purchase record plus the buyer index entry; assigns the id and
    /// timestamp and returns the record.
    ///
    /// Must share the unit of work with the buyer's balance debit.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn append_purchase(
        &self,
        uow: &mut UnitOfWork,
        buyer_id: AccountId,
        item: &str,
        price: i64,
    ) -> Result<Purchase> {
        let id = PurchaseId::new(self.next_purchase_id.fetch_add(1, Ordering::SeqCst));
        let record = Purchase {
            id,
            buyer_id,
            item: item.to_string(),
            price,
            created_at: chrono::Utc::now(),
        };

        let cf_purchases = self.cf(cf::PURCHASES)?;
        let cf_by_buyer = self.cf(cf::PURCHASES_BY_BUYER)?;

        uow.batch
            .put_cf(&cf_purchases, keys::purchase_key(id), Self::serialize(&record)?);
        uow.batch
            .put_cf(&cf_by_buyer, keys::buyer_purchase_key(buyer_id, id), []);

        Ok(record)
    }

    fn get_purchase(&self, id: PurchaseId) -> Result<Option<Purchase>> {
        let cf = self.cf(cf::PURCHASES)?;
        self.db
            .get_cf(&cf, keys::purchase_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// List purchases made by an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_purchases_by_buyer(&self, buyer_id: AccountId) -> Result<Vec<Purchase>> {
        let mut purchases = Vec::new();
        for key in self.scan_actor_index(cf::PURCHASES_BY_BUYER, buyer_id)? {
            let id = keys::extract_purchase_id(&key);
            if let Some(record) = self.get_purchase(id)? {
                purchases.push(record);
            }
        }
        Ok(purchases)
    }

    /// Collect an actor's index keys, newest first.
    ///
    /// Record ids are monotone per actor (the actor's account lock serializes
    /// their committed mutations), so descending id order is newest-first.
    fn scan_actor_index(&self, cf_name: &str, actor: AccountId) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let prefix = keys::actor_prefix(actor);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut matched: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            matched.push(key.to_vec());
        }

        matched.reverse();
        Ok(matched)
    }

    // =========================================================================
    // Merchandise Catalog
    // =========================================================================

    /// Look up a catalog item by name. Non-locking read; prices copied from
    /// the result are snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_merch_item(&self, name: &str) -> Result<Option<MerchItem>> {
        let cf = self.cf(cf::MERCH)?;
        self.db
            .get_cf(&cf, keys::merch_key(name))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// List the full catalog, ordered by item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_merch_items(&self) -> Result<Vec<MerchItem>> {
        let cf = self.cf(cf::MERCH)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            items.push(Self::deserialize(&value)?);
        }
        Ok(items)
    }

    /// Seed the default catalog into an empty store. Idempotent: a non-empty
    /// catalog is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn ensure_default_catalog(&self) -> Result<()> {
        let cf = self.cf(cf::MERCH)?;
        if self
            .db
            .iterator_cf(&cf, IteratorMode::Start)
            .next()
            .is_some()
        {
            return Ok(());
        }

        let mut next_id = self
            .next_merch_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut batch = WriteBatch::default();
        for (name, price) in DEFAULT_CATALOG {
            let item = MerchItem {
                id: MerchId::new(*next_id),
                name: (*name).to_string(),
                price: *price,
            };
            *next_id += 1;
            batch.put_cf(&cf, keys::merch_key(name), Self::serialize(&item)?);
        }
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(items = DEFAULT_CATALOG.len(), "seeded default merchandise catalog");
        Ok(())
    }
}
