//! Read-through credential cache for the login path.
//!
//! Login is by far the hottest read, so the account lifecycle keeps a small
//! in-process cache of username lookups. Only immutable fields are cached (the account id and
//! the password hash), never the balance, so a stale
//! entry can not influence any balance decision; the engines always re-read
//! balances under lock inside their unit of work.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use coin_shop_core::AccountId;

/// How long a cached credential entry stays valid.
const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Cached immutable login data for one username.
#[derive(Clone)]
struct CachedCredentials {
    account_id: AccountId,
    password_hash: String,
    cached_at: Instant,
}

/// Username-keyed credential cache with a fixed TTL.
pub(crate) struct CredentialCache {
    entries: RwLock<HashMap<String, CachedCredentials>>,
}

impl CredentialCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a fresh entry; expired entries read as misses.
    pub(crate) async fn get(&self, username: &str) -> Option<(AccountId, String)> {
        let entries = self.entries.read().await;
        let entry = entries.get(username)?;
        if entry.cached_at.elapsed() >= CACHE_TTL {
            return None;
        }
        Some((entry.account_id, entry.password_hash.clone()))
    }

    pub(crate) async fn insert(&self, username: &str, account_id: AccountId, password_hash: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(
            username.to_string(),
            CachedCredentials {
                account_id,
                password_hash: password_hash.to_string(),
                cached_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = CredentialCache::new();
        assert!(cache.get("alice").await.is_none());

        cache.insert("alice", AccountId::new(1), "hash").await;
        let (id, hash) = cache.get("alice").await.unwrap();
        assert_eq!(id, AccountId::new(1));
        assert_eq!(hash, "hash");
    }
}
