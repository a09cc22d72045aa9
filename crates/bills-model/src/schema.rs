//! Fixed portfolio schema.
//!
//! The expected and mandatory column lists are configuration data, loaded by
//! `bills-standards`. Column roles name the columns the pipeline needs to
//! interpret (keys, amounts, tiers) so that the rest of the code never
//! hard-codes a column header.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    /// Supply point identifier.
    pub supply_id: String,
    /// Invoice number; the natural key for duplicates and ingestion.
    pub invoice_id: String,
    /// Building address.
    pub address: String,
    /// Outstanding amount per bill.
    pub debt: String,
    /// Bill category.
    pub account_type: String,
    pub billing_period_end: String,
    /// The five consumption tier columns, summed into total consumption.
    pub consumption_tiers: Vec<String>,
    /// Month tag present on historical records only.
    pub processed_month: String,
    /// Supply identifier column of the master registry file.
    pub registry_supply_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSchema {
    pub name: String,
    pub expected_columns: Vec<String>,
    pub mandatory_columns: Vec<String>,
    pub roles: ColumnRoles,
}

/// Number of consumption tiers on a bill.
pub const CONSUMPTION_TIER_COUNT: usize = 5;

impl PortfolioSchema {
    pub fn is_expected(&self, column: &str) -> bool {
        self.expected_columns.iter().any(|name| name == column)
    }

    pub fn is_mandatory(&self, column: &str) -> bool {
        self.mandatory_columns.iter().any(|name| name == column)
    }

    /// Role label for a column, if it plays one.
    pub fn role_of(&self, column: &str) -> Option<&'static str> {
        let roles = &self.roles;
        if column == roles.supply_id {
            Some("supply id")
        } else if column == roles.invoice_id {
            Some("invoice id")
        } else if column == roles.address {
            Some("address")
        } else if column == roles.debt {
            Some("debt")
        } else if column == roles.account_type {
            Some("account type")
        } else if column == roles.billing_period_end {
            Some("billing period end")
        } else if roles.consumption_tiers.iter().any(|tier| tier == column) {
            Some("consumption tier")
        } else {
            None
        }
    }
}
