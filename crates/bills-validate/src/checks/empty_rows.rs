use bills_common::is_missing;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};

/// Removes rows whose every cell is missing.
///
/// Returns the cleaned table and the number of rows dropped. Running it on
/// its own output drops nothing.
pub fn drop_fully_empty_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let height = df.height();
    let mut keep = vec![false; height];
    for column in df.get_columns() {
        for (idx, slot) in keep.iter_mut().enumerate() {
            if !*slot && !is_missing(&column.get(idx)?) {
                *slot = true;
            }
        }
    }

    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let cleaned = df.filter(&mask)?;
    Ok((cleaned, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn drops_only_fully_empty_rows() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), [Some("1"), None, None, Some("4")]),
            Column::new("B".into(), [None, None, Some("3"), Some("")]),
        ])
        .unwrap();
        let (cleaned, dropped) = drop_fully_empty_rows(&df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cleaned.height(), 3);
    }

    #[test]
    fn blank_text_counts_as_empty() {
        let df = DataFrame::new(vec![
            Column::new("A".into(), ["  ", "x"]),
            Column::new("B".into(), ["", "y"]),
        ])
        .unwrap();
        let (cleaned, dropped) = drop_fully_empty_rows(&df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cleaned.height(), 1);
    }

    #[test]
    fn nothing_to_drop_returns_same_shape() {
        let df = DataFrame::new(vec![Column::new("A".into(), ["1", "2"])]).unwrap();
        let (cleaned, dropped) = drop_fully_empty_rows(&df).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(cleaned.shape(), df.shape());
    }
}
