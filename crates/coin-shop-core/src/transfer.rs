//! Coin transfer audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, TransferId};

/// An immutable record of a committed coin transfer.
///
/// Exactly one record is written per successful transfer, in the same unit
/// of work as the two balance updates it documents. The record is audit
/// history only; it is never read back to compute a balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinTransfer {
    /// Store-assigned identifier, monotone in commit order per sender.
    pub id: TransferId,

    /// The debited account.
    pub sender_id: AccountId,

    /// The credited account.
    pub recipient_id: AccountId,

    /// Transferred amount in coins. Always positive.
    pub amount: i64,

    /// When the transfer was committed.
    pub created_at: DateTime<Utc>,
}
