use std::path::PathBuf;

use bills_core::{IngestionOutcome, PortfolioMetrics};
use bills_model::{FilterLevel, PortfolioType, ProcessedMonth};
use bills_validate::ValidationReport;

#[derive(Debug)]
pub struct ValidateResult {
    pub source: PathBuf,
    pub portfolio_type: PortfolioType,
    pub report: ValidationReport,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct IngestResult {
    pub source: PathBuf,
    pub portfolio_type: PortfolioType,
    pub processed_month: ProcessedMonth,
    pub history_rows: usize,
    pub registry_size: usize,
    pub outcome: IngestionOutcome,
    /// Where the merged table was written; `None` on rejection or dry run.
    pub export_path: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct MetricsResult {
    pub portfolio_type: PortfolioType,
    /// Description of the rows treated as the current portfolio.
    pub portfolio_source: String,
    pub metrics: PortfolioMetrics,
}

#[derive(Debug)]
pub struct SearchResult {
    pub term: String,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug)]
pub struct SearchMatch {
    pub value: String,
    pub level: Option<FilterLevel>,
}
