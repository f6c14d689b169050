use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where one symbol's pipeline got to before the job ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SymbolStatus {
    /// Not started, or abandoned mid-flight by the job budget.
    Pending,
    /// Rows fetched from the feed, not yet persisted.
    Fetched,
    /// Pipeline completed. `rows_written` is 0 when the window held no new
    /// trading days, which is still success.
    #[serde(rename_all = "camelCase")]
    Written { rows_written: usize },
    #[serde(rename_all = "camelCase")]
    Failed { reason: String },
}

/// Overall job verdict, derived from the per-symbol statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobOutcome {
    Success,
    PartialFailure,
    Failure,
}

/// One ingestion run: the requested work plus everything that happened.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionJob {
    pub job_id: Uuid,
    pub requested_symbols: Vec<String>,
    pub lookback_days: i64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub per_symbol_status: BTreeMap<String, SymbolStatus>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: JobOutcome,
    /// True when the wall-clock budget expired before every symbol finished.
    /// Rows already persisted stand; the outcome is forced to `Failure`.
    pub timed_out: bool,
}

impl IngestionJob {
    pub fn rows_written(&self) -> usize {
        self.per_symbol_status
            .values()
            .map(|status| match status {
                SymbolStatus::Written { rows_written } => *rows_written,
                _ => 0,
            })
            .sum()
    }

    pub fn symbols_succeeded(&self) -> usize {
        self.per_symbol_status
            .values()
            .filter(|status| matches!(status, SymbolStatus::Written { .. }))
            .count()
    }

    /// Success when every symbol was written, Failure when none were (or the
    /// budget expired), PartialFailure otherwise.
    pub(crate) fn compute_outcome(
        statuses: &BTreeMap<String, SymbolStatus>,
        timed_out: bool,
    ) -> JobOutcome {
        if timed_out {
            return JobOutcome::Failure;
        }
        let total = statuses.len();
        let succeeded = statuses
            .values()
            .filter(|status| matches!(status, SymbolStatus::Written { .. }))
            .count();
        if succeeded == total {
            JobOutcome::Success
        } else if succeeded == 0 {
            JobOutcome::Failure
        } else {
            JobOutcome::PartialFailure
        }
    }
}
