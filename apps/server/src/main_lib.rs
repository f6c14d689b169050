use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use tickerbeat_core::ingest::{IngestService, IngestionRunner, RunnerConfig};
use tickerbeat_feed::{FeedProvider, RetryPolicy, YahooProvider};
use tickerbeat_storage_sqlite::db::{self, write_actor};
use tickerbeat_storage_sqlite::prices::PriceRepository;

pub struct AppState {
    pub ingest_service: Arc<dyn IngestService>,
    pub api_token: String,
    /// Single-flight guard: one ingestion job at a time per instance. A
    /// trigger arriving while a job runs gets 409 instead of queueing.
    pub ingest_lock: Mutex<()>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn FeedProvider> = Arc::new(YahooProvider::new()?);
    build_state_with(config, provider).await
}

/// Builds the application state around an injected feed provider, so tests
/// can run the full stack against fakes.
pub async fn build_state_with(
    config: &Config,
    provider: Arc<dyn FeedProvider>,
) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let store = Arc::new(PriceRepository::new(pool.clone(), writer));
    let runner = IngestionRunner::new(
        provider,
        store,
        RunnerConfig {
            max_concurrent_symbols: config.max_concurrent_symbols,
            job_budget: Duration::from_secs(config.job_timeout_secs),
            retry: RetryPolicy {
                max_attempts: config.fetch_max_attempts,
                ..RetryPolicy::default()
            },
        },
    );

    Ok(Arc::new(AppState {
        ingest_service: Arc::new(runner),
        api_token: config.api_token.clone(),
        ingest_lock: Mutex::new(()),
    }))
}
