use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The store's uniqueness key: one row per symbol per trading day.
pub type PriceKey = (String, NaiveDate);

/// One trading-day observation for one symbol.
///
/// Price fields are individually nullable because providers leave gaps;
/// `symbol` and `date` are mandatory and enforced by the normalizer.
/// `inserted_at` is assigned by the store writer at persist time, never by
/// the caller, and never changes afterwards (insert-if-absent semantics).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPriceRecord {
    /// Non-empty uppercase ticker.
    pub symbol: String,
    /// Trading day; partition key component in the store.
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    /// Non-negative when present.
    pub volume: Option<i64>,
    /// Write-time, set by the store writer. `None` until persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
}

impl StockPriceRecord {
    pub fn key(&self) -> PriceKey {
        (self.symbol.clone(), self.date)
    }
}

/// Downstream backtest artifact, documented here to fix the schema contract
/// the ingestion pipeline shares the store with.
///
/// The ingestion core never writes this entity; its write side is owned by
/// the external backtesting engine. In the store it is partitioned by
/// `backtest_date` and clustered by `(strategy_name, symbol)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResultRecord {
    pub backtest_id: String,
    pub strategy_name: String,
    pub symbol: String,
    pub backtest_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_return: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub win_rate: Option<f64>,
    pub num_trades: Option<i32>,
    /// Strategy parameters, opaque to the ingestion side.
    pub parameters: Option<serde_json::Value>,
    pub inserted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_key() {
        let record = StockPriceRecord {
            symbol: "AAPL".to_string(),
            date: "2024-03-01".parse().unwrap(),
            open: Some(170.0),
            high: Some(172.5),
            low: Some(169.2),
            close: Some(171.1),
            adj_close: Some(171.1),
            volume: Some(52_000_000),
            inserted_at: None,
        };
        assert_eq!(
            record.key(),
            ("AAPL".to_string(), "2024-03-01".parse().unwrap())
        );
    }
}
