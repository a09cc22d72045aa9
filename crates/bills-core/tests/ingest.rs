mod common;

use bills_core::{IngestContext, MasterRegistry, export_file_name, run_ingestion};
use bills_model::{IssueKind, PortfolioType, ProcessedMonth};
use bills_validate::ValidationStage;
use chrono::NaiveDate;
use polars::prelude::DataFrame;

use common::{bill, history, schema, upload};

fn run(upload_rows: &DataFrame) -> bills_core::IngestionOutcome {
    let schema = schema();
    let ctx = IngestContext::new(
        &schema,
        PortfolioType::Management,
        ProcessedMonth::new(2024, 4).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
    );
    let stored = history(&[bill("1").month("202403")]);
    let registry = MasterRegistry::new(["1002003".to_string()]);
    run_ingestion(&ctx, upload_rows, &stored, &registry).unwrap()
}

#[test]
fn valid_upload_is_merged_and_checked_against_registry() {
    let outcome = run(&upload(&[bill("2"), bill("3").supply("2000001")]));

    assert!(outcome.succeeded());
    let merged = outcome.reconcile.as_ref().and_then(|r| r.merged()).unwrap();
    assert_eq!(merged.series.height(), 3);
    assert_eq!(merged.file_name, "management_historical_db_20240402.csv");

    let registry = outcome.registry.as_ref().unwrap();
    assert_eq!(registry.unregistered_ids, vec!["2000001".to_string()]);
    assert!(
        outcome
            .issues()
            .iter()
            .any(|issue| issue.kind == IssueKind::UnregisteredSupply)
    );
}

#[test]
fn invalid_upload_stops_before_reconciliation() {
    let rows = upload(&[bill("2"), bill("2")]);
    let outcome = run(&rows);

    assert!(!outcome.succeeded());
    assert_eq!(
        outcome.validation.failed_stage(),
        Some(ValidationStage::DuplicateCheck)
    );
    assert!(outcome.reconcile.is_none());
    assert!(outcome.registry.is_none());
}

#[test]
fn reingested_upload_reports_already_ingested() {
    let outcome = run(&upload(&[bill("1")]));
    assert!(!outcome.succeeded());
    assert!(
        outcome
            .issues()
            .iter()
            .any(|issue| issue.kind == IssueKind::AlreadyIngested)
    );
}

#[test]
fn export_name_uses_type_and_date() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
    assert_eq!(
        export_file_name(PortfolioType::Eurobank, date),
        "eurobank_historical_db_20250109.csv"
    );
}
