//! Yahoo Finance feed provider.
//!
//! Fetches daily OHLCV history through the Yahoo Finance chart API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use time::OffsetDateTime;
use log::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::FetchError;
use crate::models::RawRow;
use crate::provider::FeedProvider;

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance feed provider.
///
/// No credentials required for daily history; the connector handles the
/// chart endpoint session internally.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, FetchError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| FetchError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to initialize Yahoo connector: {}", e),
        })?;
        Ok(Self { connector })
    }

    /// Convert a chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Convert a Yahoo quote to a raw row.
    ///
    /// Yahoo emits NaN for price gaps; those become `None` so the
    /// normalizer can apply its per-field null policy. An unrepresentable
    /// timestamp leaves `date` as `None`, which rejects the row downstream.
    fn yahoo_quote_to_raw(quote: yahoo::Quote) -> RawRow {
        let date = Utc
            .timestamp_opt(quote.timestamp as i64, 0)
            .single()
            .map(|dt| dt.date_naive());

        RawRow {
            date,
            open: finite(quote.open),
            high: finite(quote.high),
            low: finite(quote.low),
            close: finite(quote.close),
            adj_close: finite(quote.adjclose),
            volume: Some(quote.volume as i64),
        }
    }

    /// Map a Yahoo API error to the fetch taxonomy.
    ///
    /// The yahoo crate surfaces HTTP failures as stringly-typed errors, so
    /// rate limiting is recognized by message. Everything else unknown is
    /// treated as a transient provider failure; the retry budget bounds the
    /// damage if it turns out to be permanent.
    fn classify_error(e: yahoo::YahooError) -> FetchError {
        let message = e.to_string();
        if message.contains("429") || message.contains("Too Many Requests") {
            FetchError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            }
        } else if message.contains("401") || message.contains("403") {
            FetchError::AuthFailed {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            FetchError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            }
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[async_trait]
impl FeedProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>, FetchError> {
        debug!(
            "Fetching history for {} from {} to {} from Yahoo",
            symbol, start, end
        );

        let start_dt = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap());
        let end_dt = Utc.from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap());

        let response = match self
            .connector
            .get_quote_history(
                symbol,
                Self::chrono_to_offset_datetime(start_dt),
                Self::chrono_to_offset_datetime(end_dt),
            )
            .await
        {
            Ok(response) => response,
            // Absence of data is not a failure: unknown tickers and
            // non-trading windows yield an empty result.
            Err(yahoo::YahooError::NoQuotes) | Err(yahoo::YahooError::NoResult) => {
                warn!("No data returned for '{}' between {} and {}", symbol, start, end);
                return Ok(vec![]);
            }
            Err(e) => return Err(Self::classify_error(e)),
        };

        match response.quotes() {
            Ok(quotes) => Ok(quotes.into_iter().map(Self::yahoo_quote_to_raw).collect()),
            Err(yahoo::YahooError::NoQuotes) | Err(yahoo::YahooError::NoResult) => Ok(vec![]),
            Err(e) => Err(FetchError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
