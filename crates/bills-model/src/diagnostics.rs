use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

/// What went wrong (or is worth knowing) about a portfolio or store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Expected columns absent from the table.
    MissingColumns,
    /// Mandatory columns holding at least one null.
    UnfilledMandatory,
    /// Invoice identifiers repeated inside one table.
    DuplicateInvoices,
    /// Fully empty rows that were dropped.
    EmptyRows,
    /// The stored history failed its own column or duplicate check.
    HistoryInvalid,
    /// Every invoice of the upload is already in the history.
    AlreadyIngested,
    /// Some invoices of the upload are already in the history.
    OverlapWithHistory,
    /// Supply ids missing from the master registry.
    UnregisteredSupply,
    /// Registry supply ids absent from the upload.
    InactiveSupply,
}

impl IssueKind {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            IssueKind::MissingColumns
            | IssueKind::UnfilledMandatory
            | IssueKind::DuplicateInvoices
            | IssueKind::HistoryInvalid
            | IssueKind::OverlapWithHistory => IssueSeverity::Error,
            IssueKind::EmptyRows | IssueKind::UnregisteredSupply => IssueSeverity::Warning,
            IssueKind::AlreadyIngested | IssueKind::InactiveSupply => IssueSeverity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MissingColumns => "missing_columns",
            IssueKind::UnfilledMandatory => "unfilled_mandatory",
            IssueKind::DuplicateInvoices => "duplicate_invoices",
            IssueKind::EmptyRows => "empty_rows",
            IssueKind::HistoryInvalid => "history_invalid",
            IssueKind::AlreadyIngested => "already_ingested",
            IssueKind::OverlapWithHistory => "overlap_with_history",
            IssueKind::UnregisteredSupply => "unregistered_supply",
            IssueKind::InactiveSupply => "inactive_supply",
        }
    }
}

/// A single diagnostic produced by validation, reconciliation or the
/// registry check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    /// Human-readable message.
    pub message: String,
    /// Columns involved, in schema order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Number of affected rows or identifiers.
    pub count: Option<u64>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            columns: Vec::new(),
            count: None,
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count as u64);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

/// Count errors in a slice of issues.
pub fn error_count(issues: &[Issue]) -> usize {
    issues.iter().filter(|issue| issue.is_error()).count()
}

/// Count warnings in a slice of issues.
pub fn warning_count(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Warning)
        .count()
}
