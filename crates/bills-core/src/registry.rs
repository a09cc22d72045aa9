//! Master registry comparison.
//!
//! The registry is read-only here: the check reports deltas and never
//! writes back.

use std::collections::BTreeSet;

use bills_model::{Issue, IssueKind, PortfolioSchema};
use polars::prelude::{DataFrame, PolarsResult};
use tracing::{debug, info, info_span, warn};

use crate::frame_utils::{distinct_keys, filter_by_key, key_set};

/// Known supply ids of one portfolio type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterRegistry {
    supply_ids: BTreeSet<String>,
}

impl MasterRegistry {
    pub fn new(supply_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            supply_ids: supply_ids.into_iter().collect(),
        }
    }

    /// Reads the supply ids of a registry table.
    ///
    /// Fails with `ColumnNotFound` when the table lacks `column`.
    pub fn from_frame(df: &DataFrame, column: &str) -> PolarsResult<Self> {
        df.column(column)?;
        Ok(Self {
            supply_ids: key_set(df, column),
        })
    }

    pub fn len(&self) -> usize {
        self.supply_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supply_ids.is_empty()
    }

    pub fn contains(&self, supply_id: &str) -> bool {
        self.supply_ids.contains(supply_id.trim())
    }

    pub fn supply_ids(&self) -> impl Iterator<Item = &str> {
        self.supply_ids.iter().map(String::as_str)
    }
}

/// Upload rows whose supply id is not registered.
///
/// Rows with a missing supply id are reported too. Returns an empty table
/// with the upload's columns when everything is registered.
pub fn find_unregistered(
    registry: &MasterRegistry,
    upload: &DataFrame,
    supply_column: &str,
) -> PolarsResult<DataFrame> {
    filter_by_key(upload, supply_column, |key| {
        key.is_none_or(|key| !registry.contains(key))
    })
}

/// Registered supply ids that do not appear in the upload.
pub fn find_inactive(
    registry: &MasterRegistry,
    upload: &DataFrame,
    supply_column: &str,
) -> BTreeSet<String> {
    let present = key_set(upload, supply_column);
    registry
        .supply_ids()
        .filter(|id| !present.contains(*id))
        .map(str::to_string)
        .collect()
}

/// Result of comparing an upload with the master registry.
#[derive(Debug, Clone)]
pub struct RegistryCheck {
    /// Upload rows with an unregistered supply id.
    pub unregistered: DataFrame,
    /// Distinct unregistered supply ids in upload order.
    pub unregistered_ids: Vec<String>,
    pub inactive: BTreeSet<String>,
}

impl RegistryCheck {
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if self.unregistered.height() > 0 {
            issues.push(
                Issue::new(
                    IssueKind::UnregisteredSupply,
                    format!(
                        "{} rows with {} supply ids missing from the master registry",
                        self.unregistered.height(),
                        self.unregistered_ids.len()
                    ),
                )
                .with_count(self.unregistered_ids.len()),
            );
        }
        if !self.inactive.is_empty() {
            issues.push(
                Issue::new(
                    IssueKind::InactiveSupply,
                    format!(
                        "{} registered supply ids absent from the upload",
                        self.inactive.len()
                    ),
                )
                .with_count(self.inactive.len()),
            );
        }
        issues
    }
}

/// Runs both registry comparisons for an upload.
pub fn check_registry(
    schema: &PortfolioSchema,
    registry: &MasterRegistry,
    upload: &DataFrame,
) -> PolarsResult<RegistryCheck> {
    let span = info_span!("registry", registered = registry.len(), rows = upload.height());
    let _guard = span.enter();

    let supply = schema.roles.supply_id.as_str();
    let unregistered = find_unregistered(registry, upload, supply)?;
    let unregistered_ids = distinct_keys(&unregistered, supply);
    let inactive = find_inactive(registry, upload, supply);

    if unregistered.height() > 0 {
        warn!(
            rows = unregistered.height(),
            ids = unregistered_ids.len(),
            "supply ids missing from master registry"
        );
    }
    debug!(inactive = inactive.len(), "registered supply ids absent from upload");
    info!("registry check complete");

    Ok(RegistryCheck {
        unregistered,
        unregistered_ids,
        inactive,
    })
}
