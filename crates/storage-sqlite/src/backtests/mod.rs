//! Read-only access to backtest artifacts.
//!
//! The ingestion service never writes this table; the backtesting engine
//! owns the write side. This module exists so operators can inspect results
//! through the same storage layer, and so the schema contract lives next to
//! the migration that creates it.

mod model;
mod repository;

pub use model::BacktestResultRow;
pub use repository::BacktestRepository;
