//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `account_id` (big-endian).
    pub const ACCOUNTS: &str = "accounts";

    /// Index: account id by username, keyed by the raw username bytes.
    pub const ACCOUNTS_BY_USERNAME: &str = "accounts_by_username";

    /// Coin transfer records, keyed by `transfer_id` (big-endian).
    pub const TRANSFERS: &str = "transfers";

    /// Index: transfers by sender, keyed by `sender_id || transfer_id`.
    /// Value is empty (index only).
    pub const TRANSFERS_BY_SENDER: &str = "transfers_by_sender";

    /// Index: transfers by recipient, keyed by `recipient_id || transfer_id`.
    /// Value is empty (index only).
    pub const TRANSFERS_BY_RECIPIENT: &str = "transfers_by_recipient";

    /// Purchase records, keyed by `purchase_id` (big-endian).
    pub const PURCHASES: &str = "purchases";

    /// Index: purchases by buyer, keyed by `buyer_id || purchase_id`.
    /// Value is empty (index only).
    pub const PURCHASES_BY_BUYER: &str = "purchases_by_buyer";

    /// Merchandise catalog, keyed by item name.
    pub const MERCH: &str = "merch";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ACCOUNTS_BY_USERNAME,
        cf::TRANSFERS,
        cf::TRANSFERS_BY_SENDER,
        cf::TRANSFERS_BY_RECIPIENT,
        cf::PURCHASES,
        cf::PURCHASES_BY_BUYER,
        cf::MERCH,
    ]
}
