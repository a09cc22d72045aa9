//! Merging a validated monthly upload into the historical time series.
//!
//! The history is borrowed immutably. A merge either appends every upload
//! row or appends nothing.

use std::collections::BTreeSet;

use bills_model::{Issue, IssueKind};
use bills_validate::{DuplicateSet, check_columns, find_duplicates};
use polars::prelude::{DataFrame, PolarsResult};
use tracing::{debug, info, info_span, warn};

use crate::context::IngestContext;
use crate::frame_utils::{filter_by_key, key_set, stack_aligned, tag_processed_month};

/// Why an upload was not merged.
#[derive(Debug, Clone)]
pub enum Rejection {
    /// The stored history itself fails the column or duplicate check.
    SchemaInvalid {
        missing_columns: Vec<String>,
        duplicates: Option<DuplicateSet>,
    },
    /// Every invoice of the upload is already stored.
    AlreadyIngested { invoices: usize },
    /// Some invoices are already stored; the overlapping upload rows.
    PartiallyDuplicate {
        overlapping_rows: DataFrame,
        overlapping: usize,
        distinct_new: usize,
    },
}

impl Rejection {
    pub fn issue(&self) -> Issue {
        match self {
            Rejection::SchemaInvalid {
                missing_columns,
                duplicates,
            } => {
                if !missing_columns.is_empty() {
                    Issue::new(
                        IssueKind::HistoryInvalid,
                        format!(
                            "historical store is missing columns: {}",
                            missing_columns.join(", ")
                        ),
                    )
                    .with_columns(missing_columns.clone())
                    .with_count(missing_columns.len())
                } else {
                    let count = duplicates.as_ref().map_or(0, |set| set.count);
                    Issue::new(
                        IssueKind::HistoryInvalid,
                        format!("historical store has {count} duplicate rows"),
                    )
                    .with_count(count)
                }
            }
            Rejection::AlreadyIngested { invoices } => Issue::new(
                IssueKind::AlreadyIngested,
                "file already in the historical store",
            )
            .with_count(*invoices),
            Rejection::PartiallyDuplicate {
                overlapping,
                distinct_new,
                ..
            } => Issue::new(
                IssueKind::OverlapWithHistory,
                format!(
                    "{overlapping}/{distinct_new} invoices already exist in the historical store"
                ),
            )
            .with_count(*overlapping),
        }
    }
}

/// The history with the upload appended.
#[derive(Debug, Clone)]
pub struct MergedSeries {
    pub series: DataFrame,
    pub appended: usize,
    /// Suggested date-stamped export name.
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub enum ReconcileResult {
    Rejected(Rejection),
    Merged(MergedSeries),
}

impl ReconcileResult {
    pub fn is_merged(&self) -> bool {
        matches!(self, ReconcileResult::Merged(_))
    }

    pub fn merged(&self) -> Option<&MergedSeries> {
        match self {
            ReconcileResult::Merged(merged) => Some(merged),
            ReconcileResult::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ReconcileResult::Rejected(rejection) => Some(rejection),
            ReconcileResult::Merged(_) => None,
        }
    }
}

/// Reconciles an upload that already passed validation against the history.
pub fn reconcile(
    ctx: &IngestContext<'_>,
    history: &DataFrame,
    upload: &DataFrame,
) -> PolarsResult<ReconcileResult> {
    let span = info_span!(
        "reconcile",
        kind = %ctx.portfolio_type,
        month = %ctx.processed_month,
        history_rows = history.height(),
        upload_rows = upload.height()
    );
    let _guard = span.enter();

    let schema = ctx.schema;
    let invoice = schema.roles.invoice_id.as_str();

    let missing_columns = check_columns(history, &schema.expected_columns);
    if !missing_columns.is_empty() {
        warn!(missing = missing_columns.len(), "historical store fails column check");
        return Ok(ReconcileResult::Rejected(Rejection::SchemaInvalid {
            missing_columns,
            duplicates: None,
        }));
    }
    if let Some(duplicates) = find_duplicates(history, invoice)? {
        warn!(count = duplicates.count, "historical store has duplicate invoices");
        return Ok(ReconcileResult::Rejected(Rejection::SchemaInvalid {
            missing_columns,
            duplicates: Some(duplicates),
        }));
    }

    let stored = key_set(history, invoice);
    let incoming = key_set(upload, invoice);
    let common: BTreeSet<&String> = incoming.intersection(&stored).collect();

    if !common.is_empty() {
        if common.len() == incoming.len() {
            info!(invoices = incoming.len(), "upload already ingested");
            return Ok(ReconcileResult::Rejected(Rejection::AlreadyIngested {
                invoices: incoming.len(),
            }));
        }
        let overlapping_rows = filter_by_key(upload, invoice, |key| {
            key.is_some_and(|key| stored.contains(key))
        })?;
        warn!(
            overlapping = common.len(),
            distinct_new = incoming.len(),
            "upload partially overlaps historical store"
        );
        return Ok(ReconcileResult::Rejected(Rejection::PartiallyDuplicate {
            overlapping_rows,
            overlapping: common.len(),
            distinct_new: incoming.len(),
        }));
    }

    let code = ctx.processed_month.to_string();
    let tagged = tag_processed_month(upload, &schema.roles.processed_month, &code)?;
    let series = stack_aligned(history, &tagged)?;
    debug!(columns = series.width(), "aligned history and upload");
    info!(
        appended = upload.height(),
        total = series.height(),
        "merged upload into historical store"
    );

    Ok(ReconcileResult::Merged(MergedSeries {
        series,
        appended: upload.height(),
        file_name: ctx.export_file_name(),
    }))
}
