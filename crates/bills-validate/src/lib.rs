//! Portfolio validation.
//!
//! [`run_pipeline`] runs the column, empty-row, mandatory-field and duplicate
//! checks in order and stops at the first failure. The individual checks are
//! exported for callers that need one of them on its own, such as the
//! reconciler re-checking a stored history.

mod checks;
mod pipeline;
mod report;

pub use checks::{
    DuplicateSet, check_columns, check_mandatory_filled, drop_fully_empty_rows, find_duplicates,
};
pub use pipeline::{StageOutcome, StageStatus, ValidationReport, ValidationStage, run_pipeline};
pub use report::{ValidationReportPayload, build_report_payload, write_validation_report_json};
