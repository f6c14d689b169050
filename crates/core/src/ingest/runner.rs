use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, error, warn};
use tickerbeat_feed::{fetch_with_retry, FeedProvider, RetryPolicy};
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::ingest::{IngestionJob, PriceStore, SymbolStatus};
use crate::records::{normalize, plan};

/// Knobs for one runner instance.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Symbols fetched and written in flight at once.
    pub max_concurrent_symbols: usize,
    /// Wall-clock budget for the whole job. When it expires, in-flight
    /// symbols are abandoned where they stand and the job reports `Failure`.
    pub job_budget: Duration,
    pub retry: RetryPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_symbols: 4,
            job_budget: Duration::from_secs(540),
            retry: RetryPolicy::default(),
        }
    }
}

/// Entry point the trigger layer drives. Object-safe so handlers can hold a
/// `dyn` service and tests can swap in fakes.
#[async_trait]
pub trait IngestService: Send + Sync {
    async fn run(&self, symbols: Vec<String>, lookback_days: i64) -> Result<IngestionJob>;
}

/// Runs one ingestion job: per symbol, fetch from the feed, normalize, plan
/// against what the store already holds, then write the remainder.
///
/// Symbols are isolated from each other. One symbol's failure is recorded in
/// its own status and never aborts the rest of the batch.
pub struct IngestionRunner {
    provider: Arc<dyn FeedProvider>,
    store: Arc<dyn PriceStore>,
    config: RunnerConfig,
}

impl IngestionRunner {
    pub fn new(
        provider: Arc<dyn FeedProvider>,
        store: Arc<dyn PriceStore>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    fn validate(symbols: &[String], lookback_days: i64) -> Result<Vec<String>> {
        if symbols.is_empty() {
            return Err(Error::Configuration(
                "at least one symbol is required".to_string(),
            ));
        }
        if lookback_days < 1 {
            return Err(Error::Configuration(format!(
                "lookback_days must be at least 1, got {lookback_days}"
            )));
        }
        let mut cleaned = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(Error::Configuration(
                    "symbols must not be empty or whitespace".to_string(),
                ));
            }
            if !cleaned.contains(&symbol) {
                cleaned.push(symbol);
            }
        }
        Ok(cleaned)
    }

    /// One symbol's pipeline. Returns the terminal status; every failure is
    /// folded into `SymbolStatus::Failed` here rather than propagated, so
    /// the batch keeps going.
    async fn ingest_symbol(
        provider: &dyn FeedProvider,
        store: &dyn PriceStore,
        retry: &RetryPolicy,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        statuses: &Mutex<BTreeMap<String, SymbolStatus>>,
    ) {
        let status = Self::symbol_pipeline(provider, store, retry, symbol, start, end, statuses)
            .await
            .unwrap_or_else(|error| {
                error!("ingest failed for {symbol}: {error}");
                SymbolStatus::Failed {
                    reason: error.to_string(),
                }
            });
        if let Ok(mut map) = statuses.lock() {
            map.insert(symbol.to_string(), status);
        }
    }

    async fn symbol_pipeline(
        provider: &dyn FeedProvider,
        store: &dyn PriceStore,
        retry: &RetryPolicy,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        statuses: &Mutex<BTreeMap<String, SymbolStatus>>,
    ) -> Result<SymbolStatus> {
        let rows = fetch_with_retry(provider, symbol, start, end, *retry).await?;
        debug!("fetched {} raw rows for {symbol}", rows.len());
        if let Ok(mut map) = statuses.lock() {
            map.insert(symbol.to_string(), SymbolStatus::Fetched);
        }

        // A symbol with no trading days in the window is a clean no-op.
        if rows.is_empty() {
            return Ok(SymbolStatus::Written { rows_written: 0 });
        }

        let batch = normalize(symbol, rows)?;
        for rejection in &batch.rejections {
            warn!(
                "dropping row for {symbol} ({:?}): {}",
                rejection.date, rejection.reason
            );
        }

        let existing = store.existing_keys(symbol, start, end).await?;
        let planned = plan(batch.records, &existing);
        if planned.is_empty() {
            return Ok(SymbolStatus::Written { rows_written: 0 });
        }

        let attempted = planned.len();
        let report = store.write(planned).await?;
        for failed in &report.failed_rows {
            warn!(
                "store refused row for {symbol} on {}: {}",
                failed.record.date, failed.reason
            );
        }
        if report.written_count == 0 && attempted > 0 {
            return Ok(SymbolStatus::Failed {
                reason: format!("store refused all {attempted} rows"),
            });
        }
        Ok(SymbolStatus::Written {
            rows_written: report.written_count,
        })
    }
}

#[async_trait]
impl IngestService for IngestionRunner {
    async fn run(&self, symbols: Vec<String>, lookback_days: i64) -> Result<IngestionJob> {
        let symbols = Self::validate(&symbols, lookback_days)?;

        let started_at = Utc::now();
        let window_end = started_at.date_naive();
        let window_start = window_end - ChronoDuration::days(lookback_days);

        let statuses: Arc<Mutex<BTreeMap<String, SymbolStatus>>> = Arc::new(Mutex::new(
            symbols
                .iter()
                .map(|symbol| (symbol.clone(), SymbolStatus::Pending))
                .collect(),
        ));

        let work = stream::iter(symbols.iter().cloned())
            .map(|symbol| {
                let provider = Arc::clone(&self.provider);
                let store = Arc::clone(&self.store);
                let retry = self.config.retry;
                let statuses = Arc::clone(&statuses);
                async move {
                    Self::ingest_symbol(
                        provider.as_ref(),
                        store.as_ref(),
                        &retry,
                        &symbol,
                        window_start,
                        window_end,
                        &statuses,
                    )
                    .await;
                }
            })
            .buffer_unordered(self.config.max_concurrent_symbols.max(1))
            .collect::<Vec<()>>();

        let timed_out = tokio::time::timeout(self.config.job_budget, work)
            .await
            .is_err();
        if timed_out {
            warn!(
                "job budget of {:?} expired; abandoning unfinished symbols",
                self.config.job_budget
            );
        }

        let per_symbol_status = statuses
            .lock()
            .map_err(|_| Error::Unexpected("status map poisoned".to_string()))?
            .clone();
        let outcome = IngestionJob::compute_outcome(&per_symbol_status, timed_out);

        Ok(IngestionJob {
            job_id: Uuid::new_v4(),
            requested_symbols: symbols,
            lookback_days,
            window_start,
            window_end,
            per_symbol_status,
            started_at,
            finished_at: Utc::now(),
            outcome,
            timed_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WriteError;
    use crate::ingest::{JobOutcome, WriteReport};
    use crate::records::{PriceKey, StockPriceRecord};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tickerbeat_feed::{FetchError, RawRow};

    /// In-memory store honoring insert-if-absent, for exercising the runner
    /// without a database.
    #[derive(Default)]
    struct MemoryPriceStore {
        rows: Mutex<HashMap<PriceKey, StockPriceRecord>>,
    }

    impl MemoryPriceStore {
        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PriceStore for MemoryPriceStore {
        async fn existing_keys(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> std::result::Result<HashSet<PriceKey>, WriteError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .keys()
                .filter(|(s, d)| s == symbol && *d >= start && *d <= end)
                .cloned()
                .collect())
        }

        async fn write(
            &self,
            records: Vec<StockPriceRecord>,
        ) -> std::result::Result<WriteReport, WriteError> {
            let mut rows = self.rows.lock().unwrap();
            let mut written = 0;
            for mut record in records {
                let key = record.key();
                if !rows.contains_key(&key) {
                    record.inserted_at = Some(Utc::now());
                    rows.insert(key, record);
                    written += 1;
                }
            }
            Ok(WriteReport {
                written_count: written,
                failed_rows: Vec::new(),
            })
        }

        async fn prices_in_range(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> std::result::Result<Vec<StockPriceRecord>, WriteError> {
            let mut out: Vec<StockPriceRecord> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.symbol == symbol && r.date >= start && r.date <= end)
                .cloned()
                .collect();
            out.sort_by_key(|r| r.date);
            Ok(out)
        }
    }

    /// Yields one row per requested day for every symbol, counting calls.
    struct SteadyProvider {
        calls: AtomicU32,
    }

    impl SteadyProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    fn rows_for_window(start: NaiveDate, end: NaiveDate) -> Vec<RawRow> {
        let mut rows = Vec::new();
        let mut day = start;
        while day <= end {
            rows.push(RawRow::for_date(day));
            day = day.succ_opt().unwrap();
        }
        rows
    }

    #[async_trait]
    impl FeedProvider for SteadyProvider {
        fn id(&self) -> &'static str {
            "steady"
        }

        async fn fetch(
            &self,
            _symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> std::result::Result<Vec<RawRow>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(rows_for_window(start, end))
        }
    }

    /// Fails one configured symbol, serves the rest.
    struct OneBadSymbolProvider {
        bad: &'static str,
    }

    #[async_trait]
    impl FeedProvider for OneBadSymbolProvider {
        fn id(&self) -> &'static str {
            "one-bad"
        }

        async fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> std::result::Result<Vec<RawRow>, FetchError> {
            if symbol == self.bad {
                return Err(FetchError::AuthFailed {
                    provider: "one-bad".to_string(),
                });
            }
            Ok(rows_for_window(start, end))
        }
    }

    /// Never returns, to exercise the job budget.
    struct StalledProvider;

    #[async_trait]
    impl FeedProvider for StalledProvider {
        fn id(&self) -> &'static str {
            "stalled"
        }

        async fn fetch(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> std::result::Result<Vec<RawRow>, FetchError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn runner(
        provider: Arc<dyn FeedProvider>,
        store: Arc<MemoryPriceStore>,
    ) -> IngestionRunner {
        IngestionRunner::new(
            provider,
            store,
            RunnerConfig {
                retry: RetryPolicy::no_retry(),
                ..RunnerConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_run_writes_and_reports_success() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), Arc::clone(&store));

        let job = runner
            .run(vec!["spy".to_string(), "qqq".to_string()], 3)
            .await
            .unwrap();

        assert_eq!(job.outcome, JobOutcome::Success);
        assert_eq!(job.requested_symbols, vec!["SPY", "QQQ"]);
        // 3-day lookback yields 4 inclusive days per symbol.
        assert_eq!(job.rows_written(), 8);
        assert_eq!(store.len(), 8);
        assert!(matches!(
            job.per_symbol_status["SPY"],
            SymbolStatus::Written { rows_written: 4 }
        ));
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), Arc::clone(&store));

        let first = runner.run(vec!["SPY".to_string()], 2).await.unwrap();
        assert_eq!(first.rows_written(), 3);

        let second = runner.run(vec!["SPY".to_string()], 2).await.unwrap();
        assert_eq!(second.outcome, JobOutcome::Success);
        assert_eq!(second.rows_written(), 0);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_window_fills_only_gaps() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), Arc::clone(&store));

        runner.run(vec!["SPY".to_string()], 2).await.unwrap();
        // A wider window re-covers the stored days and adds older ones.
        let wider = runner.run(vec!["SPY".to_string()], 5).await.unwrap();

        assert_eq!(wider.outcome, JobOutcome::Success);
        assert_eq!(wider.rows_written(), 3);
        assert_eq!(store.len(), 6);
    }

    #[tokio::test]
    async fn test_one_symbol_failure_is_isolated() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(
            Arc::new(OneBadSymbolProvider { bad: "QQQ" }),
            Arc::clone(&store),
        );

        let job = runner
            .run(vec!["SPY".to_string(), "QQQ".to_string()], 1)
            .await
            .unwrap();

        assert_eq!(job.outcome, JobOutcome::PartialFailure);
        assert!(matches!(
            job.per_symbol_status["SPY"],
            SymbolStatus::Written { rows_written: 2 }
        ));
        assert!(matches!(
            job.per_symbol_status["QQQ"],
            SymbolStatus::Failed { .. }
        ));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_all_symbols_failing_is_failure() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(
            Arc::new(OneBadSymbolProvider { bad: "SPY" }),
            Arc::clone(&store),
        );

        let job = runner.run(vec!["SPY".to_string()], 1).await.unwrap();
        assert_eq!(job.outcome, JobOutcome::Failure);
    }

    #[tokio::test]
    async fn test_empty_symbols_is_configuration_error() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), store);

        let err = runner.run(Vec::new(), 7).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_zero_lookback_is_configuration_error() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), store);

        let err = runner.run(vec!["SPY".to_string()], 0).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_duplicate_symbols_are_collapsed() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = runner(Arc::new(SteadyProvider::new()), Arc::clone(&store));

        let job = runner
            .run(vec!["spy".to_string(), "SPY ".to_string()], 1)
            .await
            .unwrap();

        assert_eq!(job.requested_symbols, vec!["SPY"]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_budget_expiry_reports_failure_and_keeps_progress() {
        let store = Arc::new(MemoryPriceStore::default());
        let runner = IngestionRunner::new(
            Arc::new(StalledProvider),
            store.clone() as Arc<dyn PriceStore>,
            RunnerConfig {
                job_budget: Duration::from_millis(50),
                retry: RetryPolicy::no_retry(),
                ..RunnerConfig::default()
            },
        );

        let job = runner.run(vec!["SPY".to_string()], 1).await.unwrap();
        assert!(job.timed_out);
        assert_eq!(job.outcome, JobOutcome::Failure);
        assert_eq!(job.per_symbol_status["SPY"], SymbolStatus::Pending);
    }
}
