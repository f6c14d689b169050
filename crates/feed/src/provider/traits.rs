//! Feed provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::FetchError;
use crate::models::RawRow;

/// Trait for historical market data feeds.
///
/// Implement this trait to add support for a new provider. A provider is
/// pure I/O plus parsing: it fetches raw rows for one symbol over a date
/// range and carries no state across invocations.
///
/// # Contract
///
/// - "Symbol not found" and "no data in range" are a *successful empty
///   result* (`Ok(vec![])`), never an error. A newly listed ticker or a
///   weekend window is legitimate absence of trading data.
/// - Rate limiting and transient 5xx-class failures must map to a
///   [`FetchError`] whose retry class is `WithBackoff`; auth and
///   malformed-response failures to one whose class is `Never`.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and for
    /// attributing errors to a source.
    fn id(&self) -> &'static str;

    /// Fetch daily rows for `symbol` over `[start, end]` (both inclusive).
    ///
    /// Rows should be ordered by date ascending, but callers must not rely
    /// on it; the normalizer and planner are order-insensitive.
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>, FetchError>;
}
