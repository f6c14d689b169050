use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::warn;
use std::collections::HashSet;
use std::sync::Arc;

use super::model::StockPriceRow;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoWrite, StoreResult};
use crate::schema::stock_prices::dsl as prices_dsl;
use tickerbeat_core::ingest::{FailedRow, PriceStore, WriteReport};
use tickerbeat_core::records::{PriceKey, StockPriceRecord};

pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceStore for PriceRepository {
    async fn existing_keys(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<HashSet<PriceKey>> {
        let mut conn = get_connection(&self.pool)?;

        let dates: Vec<NaiveDate> = prices_dsl::stock_prices
            .filter(prices_dsl::symbol.eq(symbol))
            .filter(prices_dsl::date.between(start, end))
            .select(prices_dsl::date)
            .load(&mut conn)
            .into_write()?;

        Ok(dates
            .into_iter()
            .map(|date| (symbol.to_string(), date))
            .collect())
    }

    async fn write(&self, records: Vec<StockPriceRecord>) -> StoreResult<WriteReport> {
        if records.is_empty() {
            return Ok(WriteReport::default());
        }

        let inserted_at = Utc::now();
        let db_rows: Vec<StockPriceRow> = records
            .iter()
            .map(|record| StockPriceRow::from_record(record, inserted_at))
            .collect();

        // INSERT OR IGNORE against the (symbol, date) primary key: rows
        // already present are skipped and their stored values stand, so
        // execute() counts only genuinely new rows. A failing chunk gets a
        // bounded number of batch retries, then is replayed row by row to
        // keep one bad row from sinking its batch.
        const BATCH_ATTEMPTS: usize = 2;
        let (written_count, failed) = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> StoreResult<(usize, Vec<(StockPriceRow, String)>)> {
                let mut written = 0;
                let mut failed: Vec<(StockPriceRow, String)> = Vec::new();
                for chunk in db_rows.chunks(1_000) {
                    let mut chunk_done = false;
                    for attempt in 1..=BATCH_ATTEMPTS {
                        match diesel::insert_or_ignore_into(prices_dsl::stock_prices)
                            .values(chunk)
                            .execute(conn)
                        {
                            Ok(count) => {
                                written += count;
                                chunk_done = true;
                                break;
                            }
                            Err(chunk_err) => {
                                warn!(
                                    "price chunk insert failed (attempt {attempt}/{BATCH_ATTEMPTS}): {chunk_err}"
                                );
                            }
                        }
                    }
                    if chunk_done {
                        continue;
                    }
                    for row in chunk {
                        match diesel::insert_or_ignore_into(prices_dsl::stock_prices)
                            .values(row)
                            .execute(conn)
                        {
                            Ok(count) => written += count,
                            Err(row_err) => failed.push((row.clone(), row_err.to_string())),
                        }
                    }
                }
                Ok((written, failed))
            })
            .await?;

        Ok(WriteReport {
            written_count,
            failed_rows: failed
                .into_iter()
                .map(|(row, reason)| FailedRow {
                    record: row.into(),
                    reason,
                })
                .collect(),
        })
    }

    async fn prices_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<StockPriceRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<StockPriceRow> = prices_dsl::stock_prices
            .filter(prices_dsl::symbol.eq(symbol))
            .filter(prices_dsl::date.between(start, end))
            .order(prices_dsl::date.asc())
            .load(&mut conn)
            .into_write()?;

        Ok(rows.into_iter().map(StockPriceRecord::from).collect())
    }
}
