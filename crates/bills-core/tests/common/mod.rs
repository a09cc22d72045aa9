#![allow(dead_code)]

use bills_model::{ColumnRoles, PortfolioSchema};
use polars::prelude::{Column, DataFrame};

pub const INVOICE: &str = "ΑΡ.ΠΑΡΑΣΤΑΤΙΚΟΥ";
pub const SUPPLY: &str = "ΑΡ.ΠΑΡΟΧΗΣ";
pub const ADDRESS: &str = "ΔΙΕΥΘΥΝΣΗ";
pub const DEBT: &str = "ΟΦΕΙΛΗ";
pub const ACCOUNT_TYPE: &str = "ΤΥΠΟΣ ΛΟΓΑΡΙΑΣΜΟΥ";
pub const TIERS: [&str; 5] = ["ΚΥΒΙΚΑ 1", "ΚΥΒΙΚΑ 2", "ΚΥΒ.3", "ΚΥΒ.4", "ΚΥΒ.5"];
pub const MONTH: &str = "Processed_Month";
pub const REGISTRY_SUPPLY: &str = "Παροχή";

pub fn schema() -> PortfolioSchema {
    let mut expected: Vec<String> = [INVOICE, SUPPLY, ADDRESS, DEBT, ACCOUNT_TYPE]
        .iter()
        .map(|name| name.to_string())
        .collect();
    expected.extend(TIERS.iter().map(|name| name.to_string()));
    PortfolioSchema {
        name: "test".to_string(),
        expected_columns: expected,
        mandatory_columns: vec![INVOICE.to_string(), SUPPLY.to_string(), ADDRESS.to_string()],
        roles: ColumnRoles {
            supply_id: SUPPLY.to_string(),
            invoice_id: INVOICE.to_string(),
            address: ADDRESS.to_string(),
            debt: DEBT.to_string(),
            account_type: ACCOUNT_TYPE.to_string(),
            billing_period_end: "ΠΕΡΙΟΔΟΣ ΚΑΤΑΝΑΛΩΣΗΣ ΕΩΣ".to_string(),
            consumption_tiers: TIERS.iter().map(|name| name.to_string()).collect(),
            processed_month: MONTH.to_string(),
            registry_supply_id: REGISTRY_SUPPLY.to_string(),
        },
    }
}

#[derive(Debug, Clone)]
pub struct Bill {
    pub invoice: &'static str,
    pub supply: &'static str,
    pub address: &'static str,
    pub debt: Option<&'static str>,
    pub account_type: Option<&'static str>,
    pub tiers: [Option<&'static str>; 5],
    pub month: Option<&'static str>,
}

pub fn bill(invoice: &'static str) -> Bill {
    Bill {
        invoice,
        supply: "1002003",
        address: "ΑΘΗΝΑΣ 12",
        debt: Some("10"),
        account_type: Some("ΛΟΓΑΡ. ΥΔΡΕΥΣΗΣ"),
        tiers: [Some("1"), None, None, None, None],
        month: None,
    }
}

impl Bill {
    pub fn supply(mut self, supply: &'static str) -> Self {
        self.supply = supply;
        self
    }

    pub fn address(mut self, address: &'static str) -> Self {
        self.address = address;
        self
    }

    pub fn debt(mut self, debt: Option<&'static str>) -> Self {
        self.debt = debt;
        self
    }

    pub fn account_type(mut self, account_type: &'static str) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn tiers(mut self, tiers: [Option<&'static str>; 5]) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn month(mut self, month: &'static str) -> Self {
        self.month = Some(month);
        self
    }
}

fn base_columns(bills: &[Bill]) -> Vec<Column> {
    let mut columns = vec![
        Column::new(INVOICE.into(), bills.iter().map(|b| b.invoice).collect::<Vec<_>>()),
        Column::new(SUPPLY.into(), bills.iter().map(|b| b.supply).collect::<Vec<_>>()),
        Column::new(ADDRESS.into(), bills.iter().map(|b| b.address).collect::<Vec<_>>()),
        Column::new(DEBT.into(), bills.iter().map(|b| b.debt).collect::<Vec<_>>()),
        Column::new(
            ACCOUNT_TYPE.into(),
            bills.iter().map(|b| b.account_type).collect::<Vec<_>>(),
        ),
    ];
    for (pos, tier) in TIERS.iter().enumerate() {
        columns.push(Column::new(
            (*tier).into(),
            bills.iter().map(|b| b.tiers[pos]).collect::<Vec<_>>(),
        ));
    }
    columns
}

/// Upload-shaped frame without a processed-month column.
pub fn upload(bills: &[Bill]) -> DataFrame {
    DataFrame::new(base_columns(bills)).unwrap()
}

/// History-shaped frame carrying the processed-month column.
pub fn history(bills: &[Bill]) -> DataFrame {
    let mut columns = base_columns(bills);
    columns.push(Column::new(
        MONTH.into(),
        bills.iter().map(|b| b.month).collect::<Vec<_>>(),
    ));
    DataFrame::new(columns).unwrap()
}

pub fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}
