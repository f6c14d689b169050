//! Database model for backtest result rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use tickerbeat_core::records::BacktestResultRecord;

/// Database model for one backtest result. `parameters` is stored as a JSON
/// string and parsed on the way out.
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::backtest_results)]
#[diesel(primary_key(backtest_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BacktestResultRow {
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
    pub parameters: Option<String>,
    pub inserted_at: NaiveDateTime,
}

impl From<BacktestResultRow> for BacktestResultRecord {
    fn from(row: BacktestResultRow) -> Self {
        let parameters = row
            .parameters
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        BacktestResultRecord {
            backtest_id: row.backtest_id,
            strategy_name: row.strategy_name,
            symbol: row.symbol,
            backtest_date: row.backtest_date,
            start_date: row.start_date,
            end_date: row.end_date,
            total_return: row.total_return,
            sharpe_ratio: row.sharpe_ratio,
            max_drawdown: row.max_drawdown,
            win_rate: row.win_rate,
            num_trades: row.num_trades,
            parameters,
            inserted_at: Some(DateTime::from_naive_utc_and_offset(row.inserted_at, Utc)),
        }
    }
}
