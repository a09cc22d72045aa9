//! KPI and time-series aggregation over a filtered portfolio.

use std::collections::{BTreeMap, BTreeSet};

use bills_common::{any_to_f64, any_to_i64, cell, cell_key, is_missing};
use bills_model::{FilterLevel, PortfolioSchema, ProcessedMonth};
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};
use tracing::{debug, info_span, warn};

use crate::frame_utils::filter_by_key;

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_debt: f64,
    pub total_consumption: f64,
    /// Distinct buildings; reported at the `All` level only.
    pub building_count: Option<usize>,
    /// Distinct supply ids; reported at the `All` and `Building` levels.
    pub supply_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountTypeDebt {
    pub account_type: String,
    pub debt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: ProcessedMonth,
    /// "Mar 2024"
    pub label: String,
    pub consumption: f64,
    pub debt: f64,
}

#[derive(Debug, Clone)]
struct Derived {
    portfolio: DataFrame,
    consumption: Vec<f64>,
    kpis: Kpis,
    debt_by_account_type: Vec<AccountTypeDebt>,
    monthly: Vec<MonthlyPoint>,
    skipped_history_rows: usize,
    unparsed_amounts: usize,
}

/// Aggregates derived once at construction.
///
/// The aggregator is invalid when the filtered portfolio or the filtered
/// history is empty; every query then returns `None`.
#[derive(Debug, Clone)]
pub struct PortfolioMetrics {
    level: FilterLevel,
    derived: Option<Derived>,
}

impl PortfolioMetrics {
    pub fn new(
        schema: &PortfolioSchema,
        portfolio: &DataFrame,
        history: &DataFrame,
        level: FilterLevel,
    ) -> PolarsResult<Self> {
        let span = info_span!("metrics", level = level.as_str());
        let _guard = span.enter();

        let portfolio = filter_by_level(schema, portfolio, &level)?;
        if portfolio.height() == 0 {
            warn!(%level, "no portfolio rows for selection");
            return Ok(Self {
                level,
                derived: None,
            });
        }
        let history = filter_by_level(schema, history, &level)?;
        if history.height() == 0 {
            warn!(%level, "no historical rows for selection");
            return Ok(Self {
                level,
                derived: None,
            });
        }

        let roles = &schema.roles;
        let mut amounts = AmountReader::default();
        let consumption = amounts.consumption(&portfolio, &roles.consumption_tiers);
        let debts: Vec<f64> = (0..portfolio.height())
            .map(|idx| amounts.read(&portfolio, &roles.debt, idx))
            .collect();

        let kpis = Kpis {
            total_debt: debts.iter().sum(),
            total_consumption: consumption.iter().sum(),
            building_count: level
                .reports_building_count()
                .then(|| distinct_count(&portfolio, &roles.address)),
            supply_count: level
                .reports_supply_count()
                .then(|| distinct_count(&portfolio, &roles.supply_id)),
        };

        let mut by_type: BTreeMap<String, f64> = BTreeMap::new();
        for (idx, debt) in debts.iter().enumerate() {
            if let Some(account_type) = cell_key(&portfolio, &roles.account_type, idx) {
                *by_type.entry(account_type).or_default() += debt;
            }
        }
        let debt_by_account_type: Vec<AccountTypeDebt> = by_type
            .into_iter()
            .map(|(account_type, debt)| AccountTypeDebt { account_type, debt })
            .collect();

        let history_consumption = amounts.consumption(&history, &roles.consumption_tiers);
        let mut by_month: BTreeMap<ProcessedMonth, (f64, f64)> = BTreeMap::new();
        let mut skipped = 0usize;
        for (idx, consumed) in history_consumption.iter().enumerate() {
            let Some(month) = row_month(&history, &roles.processed_month, idx) else {
                skipped += 1;
                continue;
            };
            let entry = by_month.entry(month).or_default();
            entry.0 += consumed;
            entry.1 += amounts.read(&history, &roles.debt, idx);
        }
        if skipped > 0 {
            warn!(skipped, "historical rows without a valid processed month skipped");
        }
        if amounts.unparsed > 0 {
            warn!(
                unparsed = amounts.unparsed,
                "debt or consumption cells not numeric; counted as 0"
            );
        }
        let monthly: Vec<MonthlyPoint> = by_month
            .into_iter()
            .map(|(month, (consumption, debt))| MonthlyPoint {
                month,
                label: month.label(),
                consumption,
                debt,
            })
            .collect();

        debug!(
            rows = portfolio.height(),
            months = monthly.len(),
            account_types = debt_by_account_type.len(),
            "metrics derived"
        );

        Ok(Self {
            level,
            derived: Some(Derived {
                portfolio,
                consumption,
                kpis,
                debt_by_account_type,
                monthly,
                skipped_history_rows: skipped,
                unparsed_amounts: amounts.unparsed,
            }),
        })
    }

    pub fn level(&self) -> &FilterLevel {
        &self.level
    }

    pub fn is_valid(&self) -> bool {
        self.derived.is_some()
    }

    pub fn kpis(&self) -> Option<&Kpis> {
        self.derived.as_ref().map(|d| &d.kpis)
    }

    /// Debt summed per account type, ordered by account type.
    ///
    /// Rows without an account type are left out, so the sum can be lower
    /// than `total_debt`.
    pub fn debt_by_account_type(&self) -> Option<&[AccountTypeDebt]> {
        self.derived
            .as_ref()
            .map(|d| d.debt_by_account_type.as_slice())
    }

    /// Monthly consumption and debt of the filtered history, oldest first.
    pub fn monthly_series(&self) -> Option<&[MonthlyPoint]> {
        self.derived.as_ref().map(|d| d.monthly.as_slice())
    }

    /// Per-row consumption of the filtered portfolio.
    pub fn consumption(&self) -> Option<&[f64]> {
        self.derived.as_ref().map(|d| d.consumption.as_slice())
    }

    pub fn portfolio(&self) -> Option<&DataFrame> {
        self.derived.as_ref().map(|d| &d.portfolio)
    }

    pub fn skipped_history_rows(&self) -> Option<usize> {
        self.derived.as_ref().map(|d| d.skipped_history_rows)
    }

    /// Non-empty debt and tier cells, in the filtered portfolio and history,
    /// that could not be read as numbers and were counted as 0.
    pub fn unparsed_amount_cells(&self) -> Option<usize> {
        self.derived.as_ref().map(|d| d.unparsed_amounts)
    }
}

/// Rows matching the filter level; the whole table for `All`.
pub fn filter_by_level(
    schema: &PortfolioSchema,
    df: &DataFrame,
    level: &FilterLevel,
) -> PolarsResult<DataFrame> {
    let (column, selection) = match level {
        FilterLevel::All => return Ok(df.clone()),
        FilterLevel::Building(address) => (&schema.roles.address, address),
        FilterLevel::SupplyId(supply_id) => (&schema.roles.supply_id, supply_id),
    };
    let wanted = selection.trim();
    filter_by_key(df, column, |key| key == Some(wanted))
}

/// Most recent valid processed month in `history`.
pub fn latest_month(schema: &PortfolioSchema, history: &DataFrame) -> Option<ProcessedMonth> {
    (0..history.height())
        .filter_map(|idx| row_month(history, &schema.roles.processed_month, idx))
        .max()
}

/// Rows of `history` tagged with its most recent processed month; empty when
/// no row carries a valid month.
pub fn latest_month_rows(schema: &PortfolioSchema, history: &DataFrame) -> PolarsResult<DataFrame> {
    let column = &schema.roles.processed_month;
    let latest = latest_month(schema, history);
    let mask: Vec<bool> = (0..history.height())
        .map(|idx| latest.is_some() && row_month(history, column, idx) == latest)
        .collect();
    history.filter(&BooleanChunked::from_slice("mask".into(), &mask))
}

fn row_month(df: &DataFrame, column: &str, idx: usize) -> Option<ProcessedMonth> {
    any_to_i64(cell(df, column, idx)).and_then(|code| ProcessedMonth::from_code(code).ok())
}

/// Sum of the tier columns per row; missing or unparseable tiers count as 0.
pub fn row_consumption(df: &DataFrame, tiers: &[String]) -> Vec<f64> {
    AmountReader::default().consumption(df, tiers)
}

/// Reads amount cells as numbers, counting non-empty cells that fail to parse.
#[derive(Debug, Default)]
struct AmountReader {
    unparsed: usize,
}

impl AmountReader {
    fn read(&mut self, df: &DataFrame, column: &str, idx: usize) -> f64 {
        let value = cell(df, column, idx);
        if is_missing(&value) {
            return 0.0;
        }
        any_to_f64(value).unwrap_or_else(|| {
            self.unparsed += 1;
            0.0
        })
    }

    fn consumption(&mut self, df: &DataFrame, tiers: &[String]) -> Vec<f64> {
        (0..df.height())
            .map(|idx| tiers.iter().map(|tier| self.read(df, tier, idx)).sum())
            .collect()
    }
}

fn distinct_count(df: &DataFrame, column: &str) -> usize {
    (0..df.height())
        .filter_map(|idx| cell_key(df, column, idx))
        .collect::<BTreeSet<_>>()
        .len()
}
