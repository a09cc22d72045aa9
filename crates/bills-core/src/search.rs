//! Building and supply id lookup for drill-down selection.

use bills_model::{FilterLevel, PortfolioSchema};
use polars::prelude::DataFrame;

use crate::frame_utils::distinct_keys;

/// Distinct addresses followed by distinct supply ids whose text contains
/// `term`, ignoring case. An empty term matches everything.
pub fn search_selections(schema: &PortfolioSchema, df: &DataFrame, term: &str) -> Vec<String> {
    let needle = term.trim().to_lowercase();
    let matches = |value: &String| needle.is_empty() || value.to_lowercase().contains(&needle);

    let mut selections: Vec<String> = distinct_keys(df, &schema.roles.address)
        .into_iter()
        .filter(matches)
        .collect();
    for supply_id in distinct_keys(df, &schema.roles.supply_id) {
        if matches(&supply_id) && !selections.contains(&supply_id) {
            selections.push(supply_id);
        }
    }
    selections
}

/// Maps a selected value to the filter level it names.
///
/// Addresses win over supply ids when a value is both.
pub fn resolve_selection(
    schema: &PortfolioSchema,
    df: &DataFrame,
    selection: &str,
) -> Option<FilterLevel> {
    let wanted = selection.trim();
    if wanted.is_empty() {
        return None;
    }
    if distinct_keys(df, &schema.roles.address)
        .iter()
        .any(|address| address == wanted)
    {
        return Some(FilterLevel::Building(wanted.to_string()));
    }
    if distinct_keys(df, &schema.roles.supply_id)
        .iter()
        .any(|supply_id| supply_id == wanted)
    {
        return Some(FilterLevel::SupplyId(wanted.to_string()));
    }
    None
}
