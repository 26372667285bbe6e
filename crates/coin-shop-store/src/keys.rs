//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. Record ids are encoded big-endian so lexicographic key
//! order equals numeric order; actor indexes rely on this for time-ordered
//! scans.

use coin_shop_core::{AccountId, PurchaseId, TransferId};

/// Create an account key from an account id.
#[must_use]
pub fn account_key(id: AccountId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Create a username index key.
#[must_use]
pub fn username_key(username: &str) -> Vec<u8> {
    username.as_bytes().to_vec()
}

/// Create a transfer key from a transfer id.
#[must_use]
pub fn transfer_key(id: TransferId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Create an actor-transfer index key.
///
/// Format: `account_id (8 bytes) || transfer_id (8 bytes)`.
///
/// Transfer ids are monotone, so an actor's index entries sort oldest-first
/// under a forward scan.
#[must_use]
pub fn actor_transfer_key(actor: AccountId, transfer: TransferId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&actor.to_be_bytes());
    key.extend_from_slice(&transfer.to_be_bytes());
    key
}

/// Create a prefix for iterating all transfers for an actor.
#[must_use]
pub fn actor_prefix(actor: AccountId) -> [u8; 8] {
    actor.to_be_bytes()
}

/// Extract the transfer id from an actor-transfer index key.
///
/// # Panics
///
/// Panics if the key is not at least 16 bytes.
#[must_use]
pub fn extract_transfer_id(key: &[u8]) -> TransferId {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[8..16]);
    TransferId::from_be_bytes(bytes)
}

/// Create a purchase key from a purchase id.
#[must_use]
pub fn purchase_key(id: PurchaseId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Create a buyer-purchase index key.
///
/// Format: `buyer_id (8 bytes) || purchase_id (8 bytes)`.
#[must_use]
pub fn buyer_purchase_key(buyer: AccountId, purchase: PurchaseId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&buyer.to_be_bytes());
    key.extend_from_slice(&purchase.to_be_bytes());
    key
}

/// Extract the purchase id from a buyer-purchase index key.
///
/// # Panics
///
/// Panics if the key is not at least 16 bytes.
#[must_use]
pub fn extract_purchase_id(key: &[u8]) -> PurchaseId {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[8..16]);
    PurchaseId::from_be_bytes(bytes)
}

/// Create a merchandise key from an item name.
#[must_use]
pub fn merch_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}
