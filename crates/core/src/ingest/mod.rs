//! The ingestion job itself: orchestration, per-symbol status tracking, and
//! the storage seam the runner writes through.

mod job;
mod runner;
mod store;

pub use job::{IngestionJob, JobOutcome, SymbolStatus};
pub use runner::{IngestService, IngestionRunner, RunnerConfig};
pub use store::{FailedRow, PriceStore, WriteReport};
