//! Purchase audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, PurchaseId};

/// An immutable record of a committed merchandise purchase.
///
/// The item name and price are point-in-time copies taken when the purchase
/// committed; later catalog changes never retroactively alter history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Store-assigned identifier.
    pub id: PurchaseId,

    /// The account that was debited.
    pub buyer_id: AccountId,

    /// Name of the purchased item (denormalized snapshot).
    pub item: String,

    /// Price paid in coins (snapshot of the catalog price). Always positive.
    pub price: i64,

    /// When the purchase was committed.
    pub created_at: DateTime<Utc>,
}
