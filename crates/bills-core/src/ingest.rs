//! One ingestion session as a pure function of its inputs.
//!
//! Validation gates everything else; reconciliation and the registry check
//! run only for uploads that pass. Persisting the merged table is left to
//! the caller.

use bills_model::Issue;
use bills_validate::{ValidationReport, run_pipeline};
use polars::prelude::{DataFrame, PolarsResult};
use tracing::info;

use crate::context::IngestContext;
use crate::reconcile::{ReconcileResult, reconcile};
use crate::registry::{MasterRegistry, RegistryCheck, check_registry};

#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub validation: ValidationReport,
    pub reconcile: Option<ReconcileResult>,
    pub registry: Option<RegistryCheck>,
}

impl IngestionOutcome {
    /// True when the upload passed validation and was merged.
    pub fn succeeded(&self) -> bool {
        self.validation.passed()
            && self
                .reconcile
                .as_ref()
                .is_some_and(ReconcileResult::is_merged)
    }

    /// Issues of every step that ran, in step order.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = self.validation.issues().to_vec();
        if let Some(rejection) = self.reconcile.as_ref().and_then(ReconcileResult::rejection) {
            issues.push(rejection.issue());
        }
        if let Some(registry) = &self.registry {
            issues.extend(registry.issues());
        }
        issues
    }
}

/// Validates `upload`, reconciles it with `history` and compares it with the
/// registry.
pub fn run_ingestion(
    ctx: &IngestContext<'_>,
    upload: &DataFrame,
    history: &DataFrame,
    registry: &MasterRegistry,
) -> PolarsResult<IngestionOutcome> {
    let validation = run_pipeline(ctx.schema, upload)?;
    if !validation.passed() {
        info!(
            stage = ?validation.failed_stage(),
            "upload rejected by validation"
        );
        return Ok(IngestionOutcome {
            validation,
            reconcile: None,
            registry: None,
        });
    }

    let cleaned = validation.cleaned();
    let reconciled = reconcile(ctx, history, cleaned)?;
    let registry_check = check_registry(ctx.schema, registry, cleaned)?;

    Ok(IngestionOutcome {
        reconcile: Some(reconciled),
        registry: Some(registry_check),
        validation,
    })
}
