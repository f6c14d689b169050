//! Raw provider row shape, before normalization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw daily observation exactly as a provider delivered it.
///
/// Every field is optional: providers leave gaps, and deciding which gaps
/// are tolerable is the normalizer's job, not the feed client's. The symbol
/// is not carried here because fetches are per-symbol; the caller attaches
/// it during normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Trading day. Providers occasionally emit unparseable timestamps;
    /// those surface here as `None` and are rejected downstream.
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<i64>,
}

impl RawRow {
    /// Create a row with only a date set, prices left as gaps.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}
