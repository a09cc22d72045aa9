use std::collections::BTreeSet;

use bills_common::cell_key;
use polars::prelude::{
    BooleanChunked, Column, DataFrame, DataType, NamedFrom, NewChunkedArray, PolarsResult, Series,
};

/// Distinct non-missing keys of `column`; empty when the column is absent.
pub fn key_set(df: &DataFrame, column: &str) -> BTreeSet<String> {
    (0..df.height())
        .filter_map(|idx| cell_key(df, column, idx))
        .collect()
}

/// Distinct non-missing keys of `column` in first-seen order.
pub fn distinct_keys(df: &DataFrame, column: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    for idx in 0..df.height() {
        if let Some(key) = cell_key(df, column, idx)
            && seen.insert(key.clone())
        {
            ordered.push(key);
        }
    }
    ordered
}

/// Rows for which `keep` returns true, given the row's key in `column`.
pub fn filter_by_key(
    df: &DataFrame,
    column: &str,
    keep: impl Fn(Option<&str>) -> bool,
) -> PolarsResult<DataFrame> {
    let mask: Vec<bool> = (0..df.height())
        .map(|idx| keep(cell_key(df, column, idx).as_deref()))
        .collect();
    df.filter(&BooleanChunked::from_slice("mask".into(), &mask))
}

/// Fills the processed-month column with `code` wherever it is missing,
/// adding the column when the table has none.
pub fn tag_processed_month(df: &DataFrame, column: &str, code: &str) -> PolarsResult<DataFrame> {
    let values: Vec<String> = (0..df.height())
        .map(|idx| cell_key(df, column, idx).unwrap_or_else(|| code.to_string()))
        .collect();
    let mut tagged = df.clone();
    tagged.with_column(Series::new(column.into(), values))?;
    Ok(tagged)
}

/// Stacks `bottom` under `top`.
///
/// The result has the columns of `top` in order followed by columns only
/// `bottom` carries. Every column is cast to text; cells absent on one side
/// are null.
pub fn stack_aligned(top: &DataFrame, bottom: &DataFrame) -> PolarsResult<DataFrame> {
    let mut names: Vec<String> = top
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in bottom.get_column_names() {
        if !names.iter().any(|existing| existing == name.as_str()) {
            names.push(name.to_string());
        }
    }

    let mut stacked = align(top, &names)?;
    stacked.vstack_mut(&align(bottom, &names)?)?;
    Ok(stacked)
}

fn align(df: &DataFrame, names: &[String]) -> PolarsResult<DataFrame> {
    let height = df.height();
    let columns = names
        .iter()
        .map(|name| match df.column(name) {
            Ok(column) => column.cast(&DataType::String),
            Err(_) => Ok(Column::full_null(
                name.as_str().into(),
                height,
                &DataType::String,
            )),
        })
        .collect::<PolarsResult<Vec<Column>>>()?;
    DataFrame::new(columns)
}
