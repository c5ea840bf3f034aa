use thiserror::Error;

/// Errors that can occur when interacting with the user store.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The store could not be reached.
    #[error("User store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for user store operations.
pub type Result<T> = std::result::Result<T, UserStoreError>;
