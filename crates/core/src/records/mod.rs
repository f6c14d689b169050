//! Canonical record shapes and the transforms that produce them.

mod model;
mod normalizer;
mod planner;

pub use model::{BacktestResultRecord, PriceKey, StockPriceRecord};
pub use normalizer::{normalize, NormalizedBatch, RowRejection};
pub use planner::plan;
