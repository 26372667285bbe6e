//! Core types for the coin shop service.
//!
//! This crate provides the foundational types used throughout the coin shop:
//!
//! - **Identifiers**: `AccountId`, `TransferId`, `PurchaseId`, `MerchId`
//! - **Accounts**: `Account`, `NewAccount`
//! - **Audit records**: `CoinTransfer`, `Purchase`
//! - **Catalog**: `MerchItem`
//!
//! # Coins
//!
//! Balances, transfer amounts, and prices are whole coins stored as `i64`.
//! There are no fractional coins. A committed account balance is never
//! negative; the engines enforce this under the account's exclusive lock
//! before any debit is staged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod ids;
pub mod merch;
pub mod purchase;
pub mod transfer;

pub use account::{Account, NewAccount, STARTING_BALANCE};
pub use ids::{AccountId, IdError, MerchId, PurchaseId, TransferId};
pub use merch::{MerchItem, DEFAULT_CATALOG};
pub use purchase::Purchase;
pub use transfer::CoinTransfer;
