//! The four-stage portfolio validation pipeline.
//!
//! Stages run in a fixed order and the first failing stage stops the run.
//! Bad data never produces an `Err`; only table-engine failures do.

use std::fmt;

use bills_model::{Issue, IssueKind, PortfolioSchema, error_count, warning_count};
use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::checks::{
    DuplicateSet, check_columns, check_mandatory_filled, drop_fully_empty_rows, find_duplicates,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    ColumnCheck,
    EmptyRowCheck,
    MandatoryFieldCheck,
    DuplicateCheck,
}

impl ValidationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStage::ColumnCheck => "column_check",
            ValidationStage::EmptyRowCheck => "empty_row_check",
            ValidationStage::MandatoryFieldCheck => "mandatory_field_check",
            ValidationStage::DuplicateCheck => "duplicate_check",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValidationStage::ColumnCheck => "Column check",
            ValidationStage::EmptyRowCheck => "Empty rows",
            ValidationStage::MandatoryFieldCheck => "Mandatory fields",
            ValidationStage::DuplicateCheck => "Duplicate invoices",
        }
    }
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Passed,
    Warned,
    Failed,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Passed => "passed",
            StageStatus::Warned => "warned",
            StageStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub stage: ValidationStage,
    pub status: StageStatus,
}

/// Everything the pipeline learned about one upload.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    stages: Vec<StageOutcome>,
    issues: Vec<Issue>,
    cleaned: DataFrame,
    dropped_rows: usize,
    missing_columns: Vec<String>,
    unfilled_columns: Vec<String>,
    duplicates: Option<DuplicateSet>,
}

impl ValidationReport {
    fn new(table: DataFrame) -> Self {
        Self {
            stages: Vec::new(),
            issues: Vec::new(),
            cleaned: table,
            dropped_rows: 0,
            missing_columns: Vec::new(),
            unfilled_columns: Vec::new(),
            duplicates: None,
        }
    }

    fn record(&mut self, stage: ValidationStage, status: StageStatus) {
        self.stages.push(StageOutcome { stage, status });
    }

    pub fn passed(&self) -> bool {
        self.failed_stage().is_none()
    }

    pub fn failed_stage(&self) -> Option<ValidationStage> {
        self.stages
            .iter()
            .find(|outcome| outcome.status == StageStatus::Failed)
            .map(|outcome| outcome.stage)
    }

    /// Outcomes of the stages that ran, in order.
    pub fn stages(&self) -> &[StageOutcome] {
        &self.stages
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        error_count(&self.issues)
    }

    pub fn warning_count(&self) -> usize {
        warning_count(&self.issues)
    }

    /// The table after empty-row removal; the input table when the column
    /// check failed.
    pub fn cleaned(&self) -> &DataFrame {
        &self.cleaned
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    pub fn unfilled_columns(&self) -> &[String] {
        &self.unfilled_columns
    }

    pub fn duplicates(&self) -> Option<&DuplicateSet> {
        self.duplicates.as_ref()
    }
}

/// Validates an uploaded portfolio against the schema.
pub fn run_pipeline(schema: &PortfolioSchema, df: &DataFrame) -> PolarsResult<ValidationReport> {
    let span = info_span!("validate", rows = df.height(), columns = df.width());
    let _guard = span.enter();

    let mut report = ValidationReport::new(df.clone());

    let missing = check_columns(df, &schema.expected_columns);
    if !missing.is_empty() {
        warn!(missing = missing.len(), "column check failed");
        report.issues.push(
            Issue::new(
                IssueKind::MissingColumns,
                format!("missing columns: {}", missing.join(", ")),
            )
            .with_columns(missing.clone())
            .with_count(missing.len()),
        );
        report.missing_columns = missing;
        report.record(ValidationStage::ColumnCheck, StageStatus::Failed);
        return Ok(report);
    }
    report.record(ValidationStage::ColumnCheck, StageStatus::Passed);
    debug!("column check passed");

    let (cleaned, dropped) = drop_fully_empty_rows(df)?;
    report.cleaned = cleaned;
    report.dropped_rows = dropped;
    if dropped > 0 {
        warn!(dropped, "dropped completely empty rows");
        report.issues.push(
            Issue::new(
                IssueKind::EmptyRows,
                format!("{dropped} completely empty rows dropped"),
            )
            .with_count(dropped),
        );
        report.record(ValidationStage::EmptyRowCheck, StageStatus::Warned);
    } else {
        report.record(ValidationStage::EmptyRowCheck, StageStatus::Passed);
    }

    let unfilled = check_mandatory_filled(&report.cleaned, &schema.mandatory_columns);
    if !unfilled.is_empty() {
        warn!(unfilled = unfilled.len(), "mandatory field check failed");
        report.issues.push(
            Issue::new(
                IssueKind::UnfilledMandatory,
                format!("unfilled mandatory columns: {}", unfilled.join(", ")),
            )
            .with_columns(unfilled.clone())
            .with_count(unfilled.len()),
        );
        report.unfilled_columns = unfilled;
        report.record(ValidationStage::MandatoryFieldCheck, StageStatus::Failed);
        return Ok(report);
    }
    report.record(ValidationStage::MandatoryFieldCheck, StageStatus::Passed);

    let key = &schema.roles.invoice_id;
    if let Some(duplicates) = find_duplicates(&report.cleaned, key)? {
        warn!(count = duplicates.count, "duplicate check failed");
        report.issues.push(
            Issue::new(
                IssueKind::DuplicateInvoices,
                format!("{} duplicate rows", duplicates.count),
            )
            .with_columns(vec![key.clone()])
            .with_count(duplicates.count),
        );
        report.duplicates = Some(duplicates);
        report.record(ValidationStage::DuplicateCheck, StageStatus::Failed);
        return Ok(report);
    }
    report.record(ValidationStage::DuplicateCheck, StageStatus::Passed);

    info!(
        rows = report.cleaned.height(),
        dropped = report.dropped_rows,
        "portfolio validation passed"
    );
    Ok(report)
}
