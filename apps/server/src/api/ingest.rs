use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::post, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use tickerbeat_core::ingest::{IngestionJob, JobOutcome, SymbolStatus};

/// Watchlist used when the trigger does not name symbols.
pub const DEFAULT_SYMBOLS: [&str; 8] = [
    "SPY", "QQQ", "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA",
];

pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IngestRequest {
    pub symbols: Option<Vec<String>>,
    pub lookback_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub job_id: Uuid,
    pub outcome: JobOutcome,
    pub timed_out: bool,
    pub lookback_days: i64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub symbols_requested: usize,
    pub symbols_succeeded: usize,
    pub rows_written: usize,
    pub per_symbol_status: BTreeMap<String, SymbolStatus>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl From<IngestionJob> for IngestResponse {
    fn from(job: IngestionJob) -> Self {
        Self {
            job_id: job.job_id,
            outcome: job.outcome,
            timed_out: job.timed_out,
            lookback_days: job.lookback_days,
            window_start: job.window_start,
            window_end: job.window_end,
            symbols_requested: job.requested_symbols.len(),
            symbols_succeeded: job.symbols_succeeded(),
            rows_written: job.rows_written(),
            per_symbol_status: job.per_symbol_status,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

/// Runs one ingestion job synchronously and reports what happened.
///
/// Success and partial failure both return 200 so the scheduler does not
/// blind-retry a half-done run (the next scheduled window self-heals the
/// gaps). Total failure and budget expiry return 500, which the scheduler
/// alerts on.
async fn run_ingest(
    State(state): State<Arc<AppState>>,
    body: Option<Json<IngestRequest>>,
) -> ApiResult<impl IntoResponse> {
    let _guard = state
        .ingest_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("an ingestion job is already running".to_string()))?;

    // A bodyless trigger runs the default watchlist over the default window.
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let symbols = request.symbols.unwrap_or_else(|| {
        DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
    });
    let lookback_days = request.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);

    let job = state.ingest_service.run(symbols, lookback_days).await?;
    tracing::info!(
        "ingestion job {} finished: {:?}, {} rows written across {}/{} symbols",
        job.job_id,
        job.outcome,
        job.rows_written(),
        job.symbols_succeeded(),
        job.requested_symbols.len()
    );

    let status = match job.outcome {
        JobOutcome::Failure => StatusCode::INTERNAL_SERVER_ERROR,
        JobOutcome::Success | JobOutcome::PartialFailure => StatusCode::OK,
    };
    Ok((status, Json(IngestResponse::from(job))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ingest", post(run_ingest))
}
