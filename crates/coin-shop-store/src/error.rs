//! Error types for coin shop storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that missed.
        id: String,
    },

    /// Username already taken by a committed account.
    #[error("username already taken: {username}")]
    UsernameTaken {
        /// The conflicting username.
        username: String,
    },

    /// Timed out waiting for an exclusive lock.
    ///
    /// The unit of work that requested the lock must be aborted; the caller
    /// sees this as a storage failure, never a silent retry.
    #[error("timed out waiting for exclusive lock: {target}")]
    LockTimeout {
        /// What was contended ("account 7", "account creation").
        target: String,
    },
}

impl StoreError {
    /// Shorthand for a [`StoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
