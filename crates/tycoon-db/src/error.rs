//! Error types for the persistence layer.
//!
//! All errors are propagated via [`StoreError`] which wraps the underlying
//! [`sqlx`], [`serde_json`], and I/O errors with context about which
//! operation failed.

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A save document failed to serialize or deserialize.
    #[error("Save document error: {0}")]
    Document(#[from] serde_json::Error),

    /// A file-backend read or write failed.
    #[error("Save file error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
