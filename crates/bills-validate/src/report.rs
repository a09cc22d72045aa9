//! JSON rendering of a validation report.

use std::path::Path;

use bills_model::{Issue, PortfolioType};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::{StageOutcome, ValidationReport};

const REPORT_SCHEMA: &str = "utility-bills.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ValidationReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub source: String,
    pub portfolio_type: PortfolioType,
    pub passed: bool,
    pub failed_stage: Option<&'static str>,
    pub row_count: usize,
    pub dropped_rows: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub stages: Vec<StageOutcome>,
    pub issues: Vec<Issue>,
}

pub fn build_report_payload(
    report: &ValidationReport,
    source: &str,
    portfolio_type: PortfolioType,
    generated_at: DateTime<Utc>,
) -> ValidationReportPayload {
    ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: generated_at.to_rfc3339(),
        source: source.to_string(),
        portfolio_type,
        passed: report.passed(),
        failed_stage: report.failed_stage().map(|stage| stage.as_str()),
        row_count: report.cleaned().height(),
        dropped_rows: report.dropped_rows(),
        error_count: report.error_count(),
        warning_count: report.warning_count(),
        stages: report.stages().to_vec(),
        issues: report.issues().to_vec(),
    }
}

/// Writes the report as pretty JSON to `output_path`, creating parent
/// directories.
pub fn write_validation_report_json(
    output_path: &Path,
    report: &ValidationReport,
    source: &str,
    portfolio_type: PortfolioType,
) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let payload = build_report_payload(report, source, portfolio_type, Utc::now());
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(output_path, format!("{json}\n"))?;
    Ok(())
}
