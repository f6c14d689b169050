//! SQLite storage implementation for tickerbeat.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the [`PriceStore`] trait defined in
//! `tickerbeat-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations for the analytics tables
//! - The price repository (insert-if-absent writes, window reads)
//! - Read-only access to backtest artifacts
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. All other crates (`core`, `feed`) are database-agnostic and work
//! with traits.
//!
//! Writes go through a single writer actor holding one dedicated connection,
//! so concurrent per-symbol pipelines never contend for SQLite's write lock.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod backtests;
pub mod prices;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoWrite, StorageError, StoreResult};

pub use backtests::BacktestRepository;
pub use prices::{PriceRepository, PriceStore};
