//! Domain core of the tickerbeat ingestion pipeline.
//!
//! This crate is storage- and transport-agnostic: it defines the canonical
//! record shapes, the normalization and deduplication rules, the
//! [`PriceStore`](ingest::PriceStore) seam the storage layer implements,
//! and the job runner that drives one scheduled invocation end to end.
//! Provider I/O lives in `tickerbeat-feed`; persistence in
//! `tickerbeat-storage-sqlite`.

pub mod errors;
pub mod ingest;
pub mod records;

pub use errors::{Error, Result};
