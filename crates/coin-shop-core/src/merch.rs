//! Merchandise catalog types.

use serde::{Deserialize, Serialize};

use crate::MerchId;

/// A purchasable catalog item.
///
/// The transactional core only reads catalog rows; prices copied into
/// purchase records are snapshots, so editing the catalog never rewrites
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchItem {
    /// Item identifier.
    pub id: MerchId,

    /// Unique item name, used as the purchase key.
    pub name: String,

    /// Price in coins. Always positive.
    pub price: i64,
}

/// The default catalog seeded into an empty store at startup.
pub const DEFAULT_CATALOG: &[(&str, i64)] = &[
    ("t-shirt", 80),
    ("cup", 20),
    ("book", 50),
    ("pen", 10),
    ("powerbank", 200),
    ("hoody", 300),
    ("umbrella", 200),
    ("socks", 10),
    ("wallet", 50),
    ("pink-hoody", 500),
];
