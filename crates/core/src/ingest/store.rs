use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::WriteError;
use crate::records::{PriceKey, StockPriceRecord};

/// Outcome of one write call. A write can partially succeed: rows that the
/// store refused individually are returned rather than failing the batch.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Rows durably persisted by this call. Rows skipped because their key
    /// already existed do not count.
    pub written_count: usize,
    pub failed_rows: Vec<FailedRow>,
}

/// A record the store could not persist, with the store's reason.
#[derive(Debug)]
pub struct FailedRow {
    pub record: StockPriceRecord,
    pub reason: String,
}

/// Storage seam for daily prices.
///
/// Implementations must honor insert-if-absent: writing a record whose
/// `(symbol, date)` key already exists is a no-op that preserves the stored
/// row, including its `inserted_at`.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Keys already present for `symbol` within `[start, end]` inclusive.
    async fn existing_keys(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<PriceKey>, WriteError>;

    /// Persists `records`, assigning `inserted_at` at write time. Returns
    /// `Err` only when the store is unusable as a whole; row-level failures
    /// come back in the report.
    async fn write(&self, records: Vec<StockPriceRecord>) -> Result<WriteReport, WriteError>;

    /// Date-ordered rows for `symbol` within `[start, end]` inclusive.
    async fn prices_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StockPriceRecord>, WriteError>;
}
