mod common;

use bills_core::{MasterRegistry, check_registry, find_inactive, find_unregistered};
use bills_model::IssueKind;
use polars::prelude::{Column, DataFrame};

use common::{INVOICE, REGISTRY_SUPPLY, SUPPLY, bill, schema, strings, upload};

fn registry_frame(ids: &[&str]) -> DataFrame {
    DataFrame::new(vec![Column::new(REGISTRY_SUPPLY.into(), ids)]).unwrap()
}

#[test]
fn every_supply_registered_returns_empty_table() {
    let registry =
        MasterRegistry::from_frame(&registry_frame(&["1002003", "1002004"]), REGISTRY_SUPPLY)
            .unwrap();
    let rows = upload(&[bill("1"), bill("2").supply("1002004")]);

    let unregistered = find_unregistered(&registry, &rows, SUPPLY).unwrap();
    assert_eq!(unregistered.height(), 0);
    assert_eq!(unregistered.width(), rows.width());
}

#[test]
fn unmatched_rows_are_returned() {
    let registry = MasterRegistry::new(["1002003".to_string()]);
    let rows = upload(&[
        bill("1"),
        bill("2").supply("2000001"),
        bill("3").supply("2000001"),
        bill("4").supply("2000002"),
    ]);

    let unregistered = find_unregistered(&registry, &rows, SUPPLY).unwrap();
    assert_eq!(
        strings(&unregistered, INVOICE),
        ["2", "3", "4"].map(|id| Some(id.to_string()))
    );
}

#[test]
fn inactive_ids_are_registry_only() {
    let registry = MasterRegistry::new(["1002003".to_string(), "9999999".to_string()]);
    let rows = upload(&[bill("1")]);
    let inactive = find_inactive(&registry, &rows, SUPPLY);
    assert_eq!(inactive.into_iter().collect::<Vec<_>>(), vec!["9999999"]);
}

#[test]
fn registry_column_must_exist() {
    let frame = registry_frame(&["1002003"]);
    assert!(MasterRegistry::from_frame(&frame, "Supply").is_err());
}

#[test]
fn registry_ids_are_trimmed() {
    let registry =
        MasterRegistry::from_frame(&registry_frame(&[" 1002003 ", ""]), REGISTRY_SUPPLY).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("1002003"));
}

#[test]
fn check_reports_issues() {
    let schema = schema();
    let registry = MasterRegistry::new(["1002003".to_string(), "1002009".to_string()]);
    let rows = upload(&[bill("1"), bill("2").supply("2000001")]);

    let check = check_registry(&schema, &registry, &rows).unwrap();
    assert_eq!(check.unregistered.height(), 1);
    assert_eq!(check.unregistered_ids, vec!["2000001".to_string()]);
    assert!(check.inactive.contains("1002009"));

    let kinds: Vec<IssueKind> = check.issues().iter().map(|issue| issue.kind).collect();
    assert_eq!(
        kinds,
        vec![IssueKind::UnregisteredSupply, IssueKind::InactiveSupply]
    );
}
