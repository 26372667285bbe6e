//! Account lifecycle: login with auto-registration, username resolution,
//! and the balance read path.
//!
//! This sits outside the transactional core but shares its account store.
//! It supplies the transfer and purchase engines with account identities;
//! the engines never trust any balance it has seen.

use std::sync::Arc;

use bcrypt::DEFAULT_COST;

use coin_shop_core::{Account, AccountId, NewAccount};
use coin_shop_store::{RocksStore, StoreError};

use crate::cache::CredentialCache;
use crate::error::{EngineError, Result};

/// Resolves usernames to accounts, creating new accounts on first sight.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<RocksStore>,
    cache: Arc<CredentialCache>,
}

impl AccountService {
    /// Create a new account service over the given store.
    #[must_use]
    pub fn new(store: Arc<RocksStore>) -> Self {
        Self {
            store,
            cache: Arc::new(CredentialCache::new()),
        }
    }

    /// Authenticate a user, auto-registering unknown usernames.
    ///
    /// A username seen for the first time gets a fresh account with the
    /// starting balance; the password is hashed with bcrypt and stored. A
    /// known username must present the matching password.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidCredentials`] if the password does not match
    ///   an existing account.
    /// - [`EngineError::PasswordHash`] if hashing fails.
    /// - [`EngineError::Store`] on storage failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account> {
        if let Some((account_id, password_hash)) = self.cache.get(username).await {
            return self.verify(password, account_id, &password_hash);
        }

        match self.store.get_account_by_username(username)? {
            Some(account) => {
                if !bcrypt::verify(password, &account.password_hash)? {
                    return Err(EngineError::InvalidCredentials);
                }
                self.cache
                    .insert(username, account.id, &account.password_hash)
                    .await;
                Ok(account)
            }
            None => self.register(username, password).await,
        }
    }

    /// Create a fresh account for a first-time username.
    async fn register(&self, username: &str, password: &str) -> Result<Account> {
        let password_hash = bcrypt::hash(password, DEFAULT_COST)?;

        let mut uow = self.store.begin_unit_of_work();
        let created = self
            .store
            .create_account(
                &mut uow,
                NewAccount {
                    username: username.to_string(),
                    password_hash,
                },
            )
            .await;

        match created {
            Ok(account) => {
                self.store.commit(uow)?;
                self.cache
                    .insert(username, account.id, &account.password_hash)
                    .await;
                tracing::info!(
                    account_id = %account.id,
                    username = %account.username,
                    "account auto-registered"
                );
                Ok(account)
            }
            // A concurrent login committed this username first; fall back to
            // verifying against the account that won.
            Err(StoreError::UsernameTaken { .. }) => {
                drop(uow);
                let account = self
                    .store
                    .get_account_by_username(username)?
                    .ok_or_else(|| EngineError::AccountNotFound {
                        id: username.to_string(),
                    })?;
                if !bcrypt::verify(password, &account.password_hash)? {
                    return Err(EngineError::InvalidCredentials);
                }
                Ok(account)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Verify a password against a cached hash and load the account.
    fn verify(&self, password: &str, account_id: AccountId, password_hash: &str) -> Result<Account> {
        if !bcrypt::verify(password, password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        self.store
            .get_account(account_id)?
            .ok_or_else(|| EngineError::AccountNotFound {
                id: account_id.to_string(),
            })
    }

    /// Resolve a username to its account. Non-locking read.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AccountNotFound`] if no such username exists.
    pub fn resolve_username(&self, username: &str) -> Result<Account> {
        self.store
            .get_account_by_username(username)?
            .ok_or_else(|| EngineError::AccountNotFound {
                id: username.to_string(),
            })
    }

    /// Read an account's current balance. Non-locking point-in-time read,
    /// display only, never an input to a transactional decision.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AccountNotFound`] if the account does not
    /// exist.
    pub fn balance(&self, account_id: AccountId) -> Result<i64> {
        let account = self
            .store
            .get_account(account_id)?
            .ok_or_else(|| EngineError::AccountNotFound {
                id: account_id.to_string(),
            })?;
        Ok(account.balance)
    }
}
