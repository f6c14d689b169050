//! Market data feed clients for the ingestion pipeline.
//!
//! This crate owns all provider I/O: it defines the [`FeedProvider`] trait,
//! the raw row shape providers emit, the [`FetchError`] taxonomy with its
//! retry classification, and a bounded-backoff retry helper. It performs no
//! normalization and holds no state across invocations; every fetch re-reads
//! its full window from the provider.

pub mod errors;
pub mod models;
pub mod provider;
pub mod retry;

pub use errors::{FetchError, RetryClass};
pub use models::RawRow;
pub use provider::{FeedProvider, YahooProvider};
pub use retry::{fetch_with_retry, RetryPolicy};
