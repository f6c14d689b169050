//! Database model for daily price rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use tickerbeat_core::records::StockPriceRecord;

/// Database model for one (symbol, date) price row.
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
#[diesel(table_name = crate::schema::stock_prices)]
#[diesel(primary_key(symbol, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct StockPriceRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<i64>,
    pub inserted_at: NaiveDateTime,
}

impl StockPriceRow {
    /// Build a row from a domain record, stamping `inserted_at`.
    pub fn from_record(record: &StockPriceRecord, inserted_at: DateTime<Utc>) -> Self {
        Self {
            symbol: record.symbol.clone(),
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            adj_close: record.adj_close,
            volume: record.volume,
            inserted_at: inserted_at.naive_utc(),
        }
    }
}

impl From<StockPriceRow> for StockPriceRecord {
    fn from(row: StockPriceRow) -> Self {
        StockPriceRecord {
            symbol: row.symbol,
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close,
            volume: row.volume,
            inserted_at: Some(DateTime::from_naive_utc_and_offset(row.inserted_at, Utc)),
        }
    }
}
