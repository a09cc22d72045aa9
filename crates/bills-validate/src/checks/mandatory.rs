use bills_common::is_missing;
use polars::prelude::DataFrame;

/// Mandatory columns holding at least one missing value.
///
/// Columns absent from the table are left to [`super::check_columns`].
pub fn check_mandatory_filled(df: &DataFrame, mandatory: &[String]) -> Vec<String> {
    mandatory
        .iter()
        .filter(|name| {
            let Ok(column) = df.column(name.as_str()) else {
                return false;
            };
            (0..df.height()).any(|idx| column.get(idx).is_ok_and(|value| is_missing(&value)))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn reports_columns_with_nulls_or_blanks() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), [Some("1"), None]),
            Column::new("B".into(), ["x", " "]),
            Column::new("C".into(), ["x", "y"]),
        ])
        .unwrap();
        let mandatory = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(check_mandatory_filled(&df, &mandatory), vec!["A", "B"]);
    }

    #[test]
    fn skips_absent_columns() {
        let df = DataFrame::new(vec![Column::new("A".into(), ["1"])]).unwrap();
        assert!(check_mandatory_filled(&df, &["MISSING".to_string()]).is_empty());
    }

    #[test]
    fn na_tokens_count_as_unfilled() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), ["1", "nan"]),
            Column::new("B".into(), ["N/A", "2"]),
            Column::new("C".into(), ["NAXOU 4", "0"]),
        ])
        .unwrap();
        let mandatory = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(check_mandatory_filled(&df, &mandatory), vec!["A", "B"]);
    }
}
