use chrono::NaiveDate;
use tickerbeat_feed::RawRow;

use crate::errors::ValidationError;
use crate::records::StockPriceRecord;

/// Outcome of normalizing one symbol's raw feed rows.
///
/// Invalid rows are dropped, not fatal: the rest of the batch still flows
/// through. Rejections are kept so the runner can log what was skipped.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<StockPriceRecord>,
    pub rejections: Vec<RowRejection>,
}

/// A raw row the normalizer refused, with the reason.
#[derive(Debug)]
pub struct RowRejection {
    pub date: Option<NaiveDate>,
    pub reason: ValidationError,
}

/// Turns a provider's raw rows into canonical [`StockPriceRecord`]s.
///
/// The symbol is trimmed and uppercased once for the whole batch. Rows with
/// no date, a negative volume, or a non-finite price field (NaN or
/// infinity) are rejected individually. Missing price
/// fields are carried through as `None`, except `adj_close`, which falls
/// back to `close` when absent. An empty `rows` input is valid and yields an
/// empty batch (a symbol with no trading days in the window), but a
/// non-empty input where every row is rejected is an error: it signals a
/// malformed provider payload rather than a quiet market.
pub fn normalize(symbol: &str, rows: Vec<RawRow>) -> Result<NormalizedBatch, ValidationError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ValidationError::MissingSymbol);
    }

    let total = rows.len();
    let mut batch = NormalizedBatch::default();

    for row in rows {
        let date = match row.date {
            Some(date) => date,
            None => {
                batch.rejections.push(RowRejection {
                    date: None,
                    reason: ValidationError::MissingDate,
                });
                continue;
            }
        };
        if let Some(volume) = row.volume {
            if volume < 0 {
                batch.rejections.push(RowRejection {
                    date: Some(date),
                    reason: ValidationError::NegativeVolume(volume),
                });
                continue;
            }
        }
        if let Some(field) = non_finite_field(&row) {
            batch.rejections.push(RowRejection {
                date: Some(date),
                reason: ValidationError::NonFinitePrice(field),
            });
            continue;
        }

        batch.records.push(StockPriceRecord {
            symbol: symbol.clone(),
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close.or(row.close),
            volume: row.volume,
            inserted_at: None,
        });
    }

    if total > 0 && batch.records.is_empty() {
        return Err(ValidationError::AllRowsInvalid(total));
    }

    Ok(batch)
}

/// First price field holding NaN or an infinity, if any. A gap is `None`;
/// a non-finite number is a malformed row.
fn non_finite_field(row: &RawRow) -> Option<&'static str> {
    [
        ("open", row.open),
        ("high", row.high),
        ("low", row.low),
        ("close", row.close),
        ("adj_close", row.adj_close),
    ]
    .into_iter()
    .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
    .map(|(field, _)| field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn row(date: &str) -> RawRow {
        RawRow {
            date: Some(day(date)),
            open: Some(10.0),
            high: Some(11.0),
            low: Some(9.5),
            close: Some(10.5),
            adj_close: Some(10.4),
            volume: Some(1_000),
        }
    }

    #[test]
    fn test_normalize_uppercases_symbol() {
        let batch = normalize(" aapl ", vec![row("2024-03-01")]).unwrap();
        assert_eq!(batch.records[0].symbol, "AAPL");
    }

    #[test]
    fn test_normalize_rejects_empty_symbol() {
        let err = normalize("  ", vec![row("2024-03-01")]).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSymbol));
    }

    #[test]
    fn test_normalize_empty_input_is_valid() {
        let batch = normalize("SPY", vec![]).unwrap();
        assert!(batch.records.is_empty());
        assert!(batch.rejections.is_empty());
    }

    #[test]
    fn test_normalize_drops_dateless_rows() {
        let mut dateless = row("2024-03-01");
        dateless.date = None;
        let batch = normalize("SPY", vec![dateless, row("2024-03-04")]).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].date, day("2024-03-04"));
        assert_eq!(batch.rejections.len(), 1);
        assert!(matches!(
            batch.rejections[0].reason,
            ValidationError::MissingDate
        ));
    }

    #[test]
    fn test_normalize_rejects_negative_volume() {
        let mut bad = row("2024-03-01");
        bad.volume = Some(-5);
        let batch = normalize("SPY", vec![bad, row("2024-03-04")]).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(matches!(
            batch.rejections[0].reason,
            ValidationError::NegativeVolume(-5)
        ));
    }

    #[test]
    fn test_normalize_tolerates_null_prices() {
        let mut sparse = row("2024-03-01");
        sparse.open = None;
        sparse.high = None;
        sparse.low = None;
        sparse.close = None;
        sparse.adj_close = None;
        sparse.volume = None;
        let batch = normalize("SPY", vec![sparse]).unwrap();
        let record = &batch.records[0];
        assert_eq!(record.open, None);
        assert_eq!(record.close, None);
        assert_eq!(record.adj_close, None);
        assert_eq!(record.volume, None);
    }

    #[test]
    fn test_normalize_rejects_nan_prices() {
        let mut bad = row("2024-03-01");
        bad.open = Some(f64::NAN);
        bad.close = Some(f64::NAN);
        let batch = normalize("SPY", vec![bad, row("2024-03-04")]).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].date, day("2024-03-04"));
        assert!(matches!(
            batch.rejections[0].reason,
            ValidationError::NonFinitePrice("open")
        ));
    }

    #[test]
    fn test_normalize_rejects_infinite_prices() {
        let mut bad = row("2024-03-01");
        bad.high = Some(f64::INFINITY);
        let err = normalize("SPY", vec![bad]).unwrap_err();
        assert!(matches!(err, ValidationError::AllRowsInvalid(1)));
    }

    #[test]
    fn test_normalize_adj_close_falls_back_to_close() {
        let mut r = row("2024-03-01");
        r.adj_close = None;
        let batch = normalize("SPY", vec![r]).unwrap();
        assert_eq!(batch.records[0].adj_close, Some(10.5));
    }

    #[test]
    fn test_normalize_all_invalid_is_error() {
        let mut a = row("2024-03-01");
        a.date = None;
        let mut b = row("2024-03-04");
        b.date = None;
        let err = normalize("SPY", vec![a, b]).unwrap_err();
        assert!(matches!(err, ValidationError::AllRowsInvalid(2)));
    }
}
