mod common;

use bills_core::{resolve_selection, search_selections};
use bills_model::FilterLevel;

use common::{bill, schema, upload};

fn portfolio() -> polars::prelude::DataFrame {
    upload(&[
        bill("1").address("Αθηνάς 12"),
        bill("2").address("Πατησίων 3").supply("1002004"),
        bill("3").address("Αθηνάς 12").supply("2000001"),
    ])
}

#[test]
fn empty_term_lists_addresses_then_supply_ids() {
    let selections = search_selections(&schema(), &portfolio(), "");
    assert_eq!(
        selections,
        vec!["Αθηνάς 12", "Πατησίων 3", "1002003", "1002004", "2000001"]
    );
}

#[test]
fn term_matches_case_insensitively() {
    assert_eq!(
        search_selections(&schema(), &portfolio(), "ΑΘΗΝ"),
        vec!["Αθηνάς 12"]
    );
    assert_eq!(
        search_selections(&schema(), &portfolio(), "100200"),
        vec!["1002003", "1002004"]
    );
    assert!(search_selections(&schema(), &portfolio(), "zzz").is_empty());
}

#[test]
fn selection_resolves_to_filter_level() {
    let schema = schema();
    let df = portfolio();
    assert_eq!(
        resolve_selection(&schema, &df, "Πατησίων 3"),
        Some(FilterLevel::Building("Πατησίων 3".to_string()))
    );
    assert_eq!(
        resolve_selection(&schema, &df, "2000001"),
        Some(FilterLevel::SupplyId("2000001".to_string()))
    );
    assert_eq!(resolve_selection(&schema, &df, "unknown"), None);
    assert_eq!(resolve_selection(&schema, &df, "  "), None);
}
