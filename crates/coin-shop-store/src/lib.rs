//! `RocksDB` storage layer for the coin shop.
//!
//! This crate provides persistent storage for accounts, transfer and
//! purchase audit logs, and the merchandise catalog, using `RocksDB` with
//! column families for indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: primary account records, keyed by big-endian account id
//! - `accounts_by_username`: username index for login and resolution
//! - `transfers` / `transfers_by_sender` / `transfers_by_recipient`:
//!   transfer records plus actor indexes for history queries
//! - `purchases` / `purchases_by_buyer`: purchase records plus buyer index
//! - `merch`: the read-mostly catalog, keyed by item name
//!
//! # Unit of work
//!
//! Every mutation belonging to one logical operation is staged into a
//! [`UnitOfWork`] and committed as a single atomic batch write. Lock-reads
//! ([`RocksStore::get_account_for_update`]) park the account's exclusive
//! lock guard inside the unit of work so the read balance stays
//! authoritative until the staged writes land. Dropping a unit of work
//! aborts it.
//!
//! # Example
//!
//! ```no_run
//! use coin_shop_store::RocksStore;
//! use coin_shop_core::NewAccount;
//!
//! # async fn demo() -> coin_shop_store::Result<()> {
//! let store = RocksStore::open("/tmp/coin-shop-db")?;
//!
//! let mut uow = store.begin_unit_of_work();
//! let account = store
//!     .create_account(
//!         &mut uow,
//!         NewAccount {
//!             username: "alice".into(),
//!             password_hash: "<bcrypt>".into(),
//!         },
//!     )
//!     .await?;
//! store.commit(uow)?;
//!
//! let balance = store.get_account(account.id)?.map(|a| a.balance);
//! # let _ = balance;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
mod locks;
pub mod rocks;
pub mod schema;
mod uow;

pub use error::{Result, StoreError};
pub use locks::DEFAULT_LOCK_TIMEOUT;
pub use rocks::RocksStore;
pub use uow::UnitOfWork;
