//! Reconciliation, registry comparison and metrics for utility-bill
//! portfolios.

pub mod context;
pub mod frame_utils;
pub mod ingest;
pub mod metrics;
pub mod reconcile;
pub mod registry;
pub mod search;

pub use context::{IngestContext, export_file_name};
pub use ingest::{IngestionOutcome, run_ingestion};
pub use metrics::{
    AccountTypeDebt, Kpis, MonthlyPoint, PortfolioMetrics, filter_by_level, latest_month,
    latest_month_rows, row_consumption,
};
pub use reconcile::{MergedSeries, ReconcileResult, Rejection, reconcile};
pub use registry::{MasterRegistry, RegistryCheck, check_registry, find_inactive, find_unregistered};
pub use search::{resolve_selection, search_selections};
