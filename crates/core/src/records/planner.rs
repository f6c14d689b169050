use std::collections::HashSet;

use crate::records::{PriceKey, StockPriceRecord};

/// Selects the candidate records that should actually be inserted.
///
/// A candidate survives when its `(symbol, date)` key is absent from
/// `existing`. Duplicate keys inside the candidate batch itself keep the
/// first occurrence and drop the rest, so the plan never asks the store to
/// insert the same key twice. Existing rows are left untouched: re-ingesting
/// an overlapping window yields a plan containing only the genuinely new
/// days.
pub fn plan(
    candidates: Vec<StockPriceRecord>,
    existing: &HashSet<PriceKey>,
) -> Vec<StockPriceRecord> {
    let mut seen: HashSet<PriceKey> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|record| {
            let key = record.key();
            !existing.contains(&key) && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(symbol: &str, date: &str, close: f64) -> StockPriceRecord {
        StockPriceRecord {
            symbol: symbol.to_string(),
            date: date.parse::<NaiveDate>().unwrap(),
            open: None,
            high: None,
            low: None,
            close: Some(close),
            adj_close: Some(close),
            volume: None,
            inserted_at: None,
        }
    }

    #[test]
    fn test_plan_skips_existing_keys() {
        let existing: HashSet<PriceKey> =
            [("SPY".to_string(), "2024-03-01".parse().unwrap())].into();
        let plan = plan(
            vec![record("SPY", "2024-03-01", 1.0), record("SPY", "2024-03-04", 2.0)],
            &existing,
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].date, "2024-03-04".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn test_plan_dedupes_within_batch_keeping_first() {
        let plan = plan(
            vec![
                record("SPY", "2024-03-01", 1.0),
                record("SPY", "2024-03-01", 99.0),
            ],
            &HashSet::new(),
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].close, Some(1.0));
    }

    #[test]
    fn test_plan_fully_overlapping_window_is_empty() {
        let existing: HashSet<PriceKey> = [
            ("SPY".to_string(), "2024-03-01".parse().unwrap()),
            ("SPY".to_string(), "2024-03-04".parse().unwrap()),
        ]
        .into();
        let plan = plan(
            vec![record("SPY", "2024-03-01", 1.0), record("SPY", "2024-03-04", 2.0)],
            &existing,
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_keys_are_per_symbol() {
        let existing: HashSet<PriceKey> =
            [("SPY".to_string(), "2024-03-01".parse().unwrap())].into();
        let plan = plan(vec![record("QQQ", "2024-03-01", 1.0)], &existing);
        assert_eq!(plan.len(), 1);
    }
}
