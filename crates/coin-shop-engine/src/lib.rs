//! Transactional core for the coin shop.
//!
//! This crate owns every balance mutation in the system:
//!
//! - [`TransferEngine`]: atomic coin movement between two accounts
//! - [`PurchaseEngine`]: atomic debit of a buyer against a catalog item
//! - [`AccountService`]: login / auto-registration and username resolution
//!
//! # Invariants
//!
//! - **Conservation**: a transfer never changes the total coin supply; the
//!   debit and credit commit in one unit of work or not at all.
//! - **Non-negativity**: a committed balance is never negative; every debit
//!   is checked against a balance read under the account's exclusive lock.
//! - **Atomicity**: an operation that returns an error leaves balances and
//!   audit logs exactly as they were.
//!
//! Engines hold no state of their own beyond the store handle; all
//! concurrency control lives in the store's per-account locks and the
//! ascending-id lock order the engines observe.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accounts;
mod cache;
pub mod error;
pub mod purchase;
pub mod transfer;

pub use accounts::AccountService;
pub use error::{EngineError, Result};
pub use purchase::PurchaseEngine;
pub use transfer::TransferEngine;
