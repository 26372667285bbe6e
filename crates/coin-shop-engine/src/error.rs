//! Error types for the transactional core.

use coin_shop_store::StoreError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in engine operations.
///
/// Every failure is terminal for the operation that produced it: the unit of
/// work aborts and no partial mutation is observable. There are no hidden
/// retries; the HTTP layer decides user-facing messaging.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Transfer amount was zero or negative. Rejected before any storage
    /// access.
    #[error("amount must be positive")]
    InvalidAmount,

    /// Sender and recipient are the same account. Rejected before any
    /// storage access; a committed self-transfer would net to zero but still
    /// write a spurious audit record.
    #[error("cannot transfer coins to the same account")]
    SelfTransfer,

    /// Sender, recipient, or buyer does not resolve to a live account.
    #[error("account not found: {id}")]
    AccountNotFound {
        /// The identifier or username that missed.
        id: String,
    },

    /// The debited account cannot cover the amount.
    #[error("insufficient coins: balance={balance}, required={required}")]
    InsufficientCoins {
        /// Current balance in coins.
        balance: i64,
        /// Required amount in coins.
        required: i64,
    },

    /// The purchase references an unknown catalog entry.
    #[error("item not found: {name}")]
    ItemNotFound {
        /// The requested item name.
        name: String,
    },

    /// Password verification failed for an existing account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Underlying storage, lock-timeout, or commit failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Map a store error from an account lookup, turning `NotFound` into the
    /// engine-level [`EngineError::AccountNotFound`].
    pub(crate) fn from_account_lookup(err: StoreError) -> Self {
        match err {
            StoreError::NotFound {
                entity: "account",
                id,
            } => Self::AccountNotFound { id },
            other => Self::Store(other),
        }
    }
}

impl From<bcrypt::BcryptError> for EngineError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err.to_string())
    }
}
