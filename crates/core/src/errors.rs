//! Core error types for the ingestion pipeline.
//!
//! This module defines storage-agnostic error types. Storage-specific
//! errors (from Diesel, SQLite, etc.) are converted to [`WriteError`] by
//! the storage layer before crossing into the core.
//!
//! Containment policy: per-symbol errors ([`tickerbeat_feed::FetchError`],
//! [`ValidationError`], per-row write failures) never abort an invocation;
//! they are aggregated into the job's per-symbol statuses. Only
//! [`Error::Configuration`] aborts before any fetch, and a blown wall-clock
//! budget abandons the run with whatever statuses were reached.

use thiserror::Error;

use tickerbeat_feed::FetchError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ingestion pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal, never retried: missing required parameter, empty symbol
    /// list, invalid lookback. Surfaced before any fetch happens.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store write failed: {0}")]
    Write(#[from] WriteError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised while validating raw provider rows.
///
/// A rejected row is dropped with a logged reason; the whole symbol fails
/// only when every row in the batch is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The symbol attached to the batch is empty.
    #[error("Symbol must be a non-empty ticker")]
    MissingSymbol,

    /// The row carries no parseable trading date.
    #[error("Row is missing its trading date")]
    MissingDate,

    /// Volume must be a non-negative integer when present.
    #[error("Negative volume: {0}")]
    NegativeVolume(i64),

    /// A price field carries NaN or an infinity. Gaps must be `None`, not
    /// a non-finite sentinel.
    #[error("Non-finite value in price field {0}")]
    NonFinitePrice(&'static str),

    /// Every row in a non-empty batch was rejected.
    #[error("All {0} rows for the symbol were invalid")]
    AllRowsInvalid(usize),
}

/// Storage-agnostic error type for store writer operations.
///
/// This enum uses `String` for all error details, allowing the storage
/// layer to convert backend-specific errors into this format.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to establish a store connection.
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create store pool: {0}")]
    PoolCreationFailed(String),

    /// A store query failed to execute.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Store migration failed.
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}
