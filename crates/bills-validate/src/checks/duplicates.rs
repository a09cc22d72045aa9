//! Natural-key duplicate detection.
//!
//! Both the count and the returned row set use the canonical key rendering,
//! so `"INV-1"` and `" INV-1 "` are the same invoice. A missing key is a key
//! value of its own: two rows without an invoice number are duplicates.

use std::collections::HashMap;

use bills_common::cell_key;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};

/// Rows taking part in a duplication.
#[derive(Debug, Clone)]
pub struct DuplicateSet {
    /// Rows repeating an earlier key; the first occurrence is not counted.
    pub count: usize,
    /// Every row whose key occurs more than once, in table order.
    pub rows: DataFrame,
    /// Distinct duplicated keys in first-seen order; `None` for a missing key.
    pub keys: Vec<Option<String>>,
}

/// Finds rows sharing a value of `key_column`.
///
/// Returns `None` when every key is unique or the column is absent.
pub fn find_duplicates(df: &DataFrame, key_column: &str) -> PolarsResult<Option<DuplicateSet>> {
    if df.column(key_column).is_err() {
        tracing::debug!(column = key_column, "key column absent, duplicate check skipped");
        return Ok(None);
    }

    let keys: Vec<Option<String>> = (0..df.height())
        .map(|idx| cell_key(df, key_column, idx))
        .collect();

    let mut occurrences: HashMap<&Option<String>, usize> = HashMap::new();
    for key in &keys {
        *occurrences.entry(key).or_default() += 1;
    }

    let count: usize = occurrences.values().map(|n| n - 1).sum();
    if count == 0 {
        return Ok(None);
    }

    let mask: Vec<bool> = keys.iter().map(|key| occurrences[key] > 1).collect();
    let mut duplicated_keys: Vec<Option<String>> = Vec::new();
    for (key, repeated) in keys.iter().zip(&mask) {
        if *repeated && !duplicated_keys.contains(key) {
            duplicated_keys.push(key.clone());
        }
    }

    let rows = df.filter(&BooleanChunked::from_slice("duplicate".into(), &mask))?;
    Ok(Some(DuplicateSet {
        count,
        rows,
        keys: duplicated_keys,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn repeated_key_counts_once_and_returns_both_rows() {
        let df = DataFrame::new(vec![
            Column::new("INV".into(), ["A", "A", "B"]),
            Column::new("AMOUNT".into(), ["1", "2", "3"]),
        ])
        .unwrap();
        let set = find_duplicates(&df, "INV").unwrap().unwrap();
        assert_eq!(set.count, 1);
        assert_eq!(set.rows.height(), 2);
        assert_eq!(set.keys, vec![Some("A".to_string())]);
    }

    #[test]
    fn triple_counts_two() {
        let df = DataFrame::new(vec![Column::new("INV".into(), ["A", " A", "A ", "B"])]).unwrap();
        let set = find_duplicates(&df, "INV").unwrap().unwrap();
        assert_eq!(set.count, 2);
        assert_eq!(set.rows.height(), 3);
    }

    #[test]
    fn missing_keys_are_one_value() {
        let df = DataFrame::new(vec![Column::new("INV".into(), [None, Some("A"), None])]).unwrap();
        let set = find_duplicates(&df, "INV").unwrap().unwrap();
        assert_eq!(set.count, 1);
        assert_eq!(set.keys, vec![None]);
    }

    #[test]
    fn unique_keys_return_none() {
        let df = DataFrame::new(vec![Column::new("INV".into(), ["A", "B"])]).unwrap();
        assert!(find_duplicates(&df, "INV").unwrap().is_none());
        assert!(find_duplicates(&df, "OTHER").unwrap().is_none());
    }
}
