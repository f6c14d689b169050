use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::BacktestResultRow;
use crate::db::get_connection;
use crate::errors::{IntoWrite, StoreResult};
use crate::schema::backtest_results::dsl as backtests_dsl;
use tickerbeat_core::records::BacktestResultRecord;

pub struct BacktestRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl BacktestRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Results produced on `backtest_date`, ordered by the lookup index:
    /// strategy name, then symbol.
    pub fn results_for_date(
        &self,
        backtest_date: NaiveDate,
    ) -> StoreResult<Vec<BacktestResultRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<BacktestResultRow> = backtests_dsl::backtest_results
            .filter(backtests_dsl::backtest_date.eq(backtest_date))
            .order((
                backtests_dsl::strategy_name.asc(),
                backtests_dsl::symbol.asc(),
            ))
            .load(&mut conn)
            .into_write()?;

        Ok(rows.into_iter().map(BacktestResultRecord::from).collect())
    }

    /// Most recent result for one strategy and symbol, if any.
    pub fn latest_for_symbol(
        &self,
        strategy_name: &str,
        symbol: &str,
    ) -> StoreResult<Option<BacktestResultRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let row = backtests_dsl::backtest_results
            .filter(backtests_dsl::strategy_name.eq(strategy_name))
            .filter(backtests_dsl::symbol.eq(symbol))
            .order(backtests_dsl::backtest_date.desc())
            .first::<BacktestResultRow>(&mut conn)
            .optional()
            .into_write()?;

        Ok(row.map(BacktestResultRecord::from))
    }
}
