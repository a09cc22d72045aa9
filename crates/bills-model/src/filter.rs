use std::fmt;

use serde::{Deserialize, Serialize};

/// Drill-down level for portfolio metrics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "level", content = "value", rename_all = "snake_case")]
pub enum FilterLevel {
    /// Whole portfolio.
    #[default]
    All,
    /// Rows whose address equals the given building address.
    Building(String),
    /// Rows whose supply identifier equals the given id.
    SupplyId(String),
}

impl FilterLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterLevel::All => "all",
            FilterLevel::Building(_) => "building",
            FilterLevel::SupplyId(_) => "supply_id",
        }
    }

    /// Selected value, if the level narrows the portfolio.
    pub fn selection(&self) -> Option<&str> {
        match self {
            FilterLevel::All => None,
            FilterLevel::Building(value) | FilterLevel::SupplyId(value) => Some(value.as_str()),
        }
    }

    /// Building counts only make sense for the whole portfolio.
    pub fn reports_building_count(&self) -> bool {
        matches!(self, FilterLevel::All)
    }

    /// A single supply point has no supply-id count.
    pub fn reports_supply_count(&self) -> bool {
        matches!(self, FilterLevel::All | FilterLevel::Building(_))
    }
}

impl fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.selection() {
            Some(value) => write!(f, "{} '{}'", self.as_str(), value),
            None => write!(f, "{}", self.as_str()),
        }
    }
}
