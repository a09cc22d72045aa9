use std::collections::HashSet;

use polars::prelude::DataFrame;

/// Expected columns absent from the table, in schema order.
///
/// An empty result means the check passed. Extra columns are allowed.
pub fn check_columns(df: &DataFrame, expected: &[String]) -> Vec<String> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    expected
        .iter()
        .filter(|column| !present.contains(column.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn reports_missing_in_schema_order() {
        let df = DataFrame::new(vec![Column::new("B".into(), ["1"])]).unwrap();
        let expected = vec!["C".to_string(), "B".to_string(), "A".to_string()];
        assert_eq!(check_columns(&df, &expected), vec!["C", "A"]);
    }

    #[test]
    fn extra_columns_pass() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), ["1"]),
            Column::new("EXTRA".into(), ["x"]),
        ])
        .unwrap();
        assert!(check_columns(&df, &["A".to_string()]).is_empty());
    }
}
