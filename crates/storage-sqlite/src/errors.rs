//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and
//! convert them to the storage-agnostic [`WriteError`] defined in
//! `tickerbeat_core`.

use diesel::result::Error as DieselError;
use thiserror::Error;
use tickerbeat_core::errors::WriteError;

/// Result type for operations inside the storage layer, before crossing
/// back into the core.
pub type StoreResult<T> = std::result::Result<T, WriteError>;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// [`WriteError`] before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// A [`WriteError`] crossing back through the write actor's
    /// transaction wrapper, which needs one error type inside the closure.
    #[error("{0}")]
    Write(#[from] WriteError),
}

impl From<StorageError> for WriteError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Write(e) => e,
            StorageError::ConnectionFailed(e) => WriteError::ConnectionFailed(e.to_string()),
            StorageError::PoolError(e) => WriteError::PoolCreationFailed(e.to_string()),
            StorageError::QueryFailed(DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            )) => WriteError::UniqueViolation(info.message().to_string()),
            StorageError::QueryFailed(e) => WriteError::QueryFailed(e.to_string()),
            StorageError::MigrationFailed(e) => WriteError::MigrationFailed(e),
            StorageError::Io(e) => WriteError::Internal(e.to_string()),
        }
    }
}

/// Extension trait for converting Diesel and r2d2 Results into
/// [`WriteError`] Results.
///
/// Since we can't implement `From<DieselError> for WriteError` due to
/// orphan rules, this trait provides a method to perform the conversion.
pub trait IntoWrite<T> {
    fn into_write(self) -> StoreResult<T>;
}

impl<T> IntoWrite<T> for std::result::Result<T, DieselError> {
    fn into_write(self) -> StoreResult<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoWrite<T> for std::result::Result<T, r2d2::Error> {
    fn into_write(self) -> StoreResult<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoWrite<T> for std::result::Result<T, diesel::ConnectionError> {
    fn into_write(self) -> StoreResult<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
