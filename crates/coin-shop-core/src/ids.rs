//! Identifier types for the coin shop.
//!
//! This module provides strongly-typed identifiers for accounts and audit
//! records.
//!
//! # Macro-based ID Types
//!
//! The `i64_id_type!` macro reduces boilerplate for the sequential identifier
//! types, ensuring consistent implementation of serialization, parsing, and
//! display traits. Identifiers are assigned by the store at record creation
//! and are opaque to callers; only the store relies on them being monotone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to define a sequential identifier type with standard trait
/// implementations.
///
/// This macro generates a newtype wrapper around `i64` with implementations
/// for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - `Serialize`, `Deserialize` (as a plain integer)
/// - `FromStr`, `Display`, `Debug`
/// - big-endian byte conversion for storage keys
macro_rules! i64_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier from a raw integer.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the raw integer value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Return the big-endian byte encoding (8 bytes).
            ///
            /// Big-endian keeps lexicographic key order equal to numeric
            /// order, which the store's index scans rely on.
            #[must_use]
            pub const fn to_be_bytes(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }

            /// Create an identifier from its big-endian byte encoding.
            #[must_use]
            pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
                Self(i64::from_be_bytes(bytes))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.parse::<i64>().map_err(|_| IdError::InvalidInteger)?;
                Ok(Self(raw))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

i64_id_type!(
    AccountId,
    "An account identifier, assigned sequentially by the store at creation."
);
i64_id_type!(
    TransferId,
    "A coin-transfer record identifier, assigned sequentially by the transfer log."
);
i64_id_type!(
    PurchaseId,
    "A purchase record identifier, assigned sequentially by the purchase log."
);
i64_id_type!(
    MerchId,
    "A merchandise item identifier."
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid integer identifier.
    #[error("invalid integer identifier")]
    InvalidInteger,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_roundtrip() {
        let id = AccountId::new(42);
        let parsed = AccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn account_id_serde_json_is_plain_integer() {
        let id = AccountId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let parsed: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn transfer_id_bytes_roundtrip() {
        let id = TransferId::new(9_000_000_001);
        let parsed = TransferId::from_be_bytes(id.to_be_bytes());
        assert_eq!(id, parsed);
    }

    #[test]
    fn byte_encoding_preserves_order() {
        let low = AccountId::new(3).to_be_bytes();
        let high = AccountId::new(300).to_be_bytes();
        assert!(low < high);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            AccountId::from_str("not-a-number"),
            Err(IdError::InvalidInteger)
        );
    }
}
