//! Portfolio schema loading.

use std::collections::BTreeSet;
use std::path::Path;

use bills_model::{CONSUMPTION_TIER_COUNT, PortfolioSchema};

use crate::error::{Result, StandardsError};
use crate::paths::portfolio_schema_path;

/// Load the schema configured under [`crate::schema_root`].
pub fn load_default_schema() -> Result<PortfolioSchema> {
    load_schema(&portfolio_schema_path())
}

/// Read and validate a portfolio schema file.
pub fn load_schema(path: &Path) -> Result<PortfolioSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    let schema = parse_schema(&content, path)?;
    tracing::debug!(
        path = %path.display(),
        expected = schema.expected_columns.len(),
        mandatory = schema.mandatory_columns.len(),
        "loaded portfolio schema"
    );
    Ok(schema)
}

/// Parse schema TOML; `path` is only used in error messages.
pub fn parse_schema(content: &str, path: &Path) -> Result<PortfolioSchema> {
    let schema: PortfolioSchema =
        toml::from_str(content).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Structural checks applied to every loaded schema.
pub fn validate_schema(schema: &PortfolioSchema) -> Result<()> {
    if schema.expected_columns.is_empty() {
        return Err(StandardsError::invalid("expected_columns is empty"));
    }
    ensure_unique(&schema.expected_columns, "expected_columns")?;
    ensure_unique(&schema.mandatory_columns, "mandatory_columns")?;

    for column in &schema.mandatory_columns {
        if !schema.is_expected(column) {
            return Err(StandardsError::invalid(format!(
                "mandatory column '{column}' is not an expected column"
            )));
        }
    }

    let roles = &schema.roles;
    let role_columns = [
        ("supply_id", &roles.supply_id),
        ("invoice_id", &roles.invoice_id),
        ("address", &roles.address),
        ("debt", &roles.debt),
        ("account_type", &roles.account_type),
        ("billing_period_end", &roles.billing_period_end),
    ];
    for (role, column) in role_columns {
        if !schema.is_expected(column) {
            return Err(StandardsError::UnknownRoleColumn {
                role,
                column: column.clone(),
            });
        }
    }

    if roles.consumption_tiers.len() != CONSUMPTION_TIER_COUNT {
        return Err(StandardsError::invalid(format!(
            "expected {CONSUMPTION_TIER_COUNT} consumption tiers, found {}",
            roles.consumption_tiers.len()
        )));
    }
    ensure_unique(&roles.consumption_tiers, "consumption_tiers")?;
    for column in &roles.consumption_tiers {
        if !schema.is_expected(column) {
            return Err(StandardsError::UnknownRoleColumn {
                role: "consumption_tier",
                column: column.clone(),
            });
        }
    }

    if roles.processed_month.trim().is_empty() {
        return Err(StandardsError::invalid("processed_month role is blank"));
    }
    if roles.registry_supply_id.trim().is_empty() {
        return Err(StandardsError::invalid("registry_supply_id role is blank"));
    }
    Ok(())
}

fn ensure_unique(columns: &[String], list: &'static str) -> Result<()> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(StandardsError::DuplicateColumn {
                column: column.clone(),
                list,
            });
        }
    }
    Ok(())
}
