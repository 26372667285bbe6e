//! Account types for the coin shop.
//!
//! This module defines the account record and its creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Balance granted to every account at registration, in coins.
pub const STARTING_BALANCE: i64 = 1000;

/// A user account.
///
/// The account owns the authoritative coin balance. Balances are mutated only
/// through the transfer and purchase engines, inside a unit of work that
/// holds the account's exclusive lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,

    /// Unique username, immutable after creation.
    pub username: String,

    /// bcrypt hash of the account password. Opaque to the transactional
    /// core; only the account lifecycle reads it.
    pub password_hash: String,

    /// Current coin balance. Never negative in committed state.
    pub balance: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Check whether the balance covers a debit of `amount` coins.
    #[must_use]
    pub fn has_sufficient_coins(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

/// Input for account creation.
///
/// The store assigns the identifier, the starting balance, and the creation
/// timestamp; callers supply only the credentials.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Requested username.
    pub username: String,

    /// bcrypt hash of the password.
    pub password_hash: String,
}
