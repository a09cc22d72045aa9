//! Portfolio identity types.
//!
//! A portfolio is one monthly export of utility bills for one account holder
//! group. Each portfolio type owns its own historical store and master
//! registry.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BillsError;

/// Portfolio type tag declared with every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioType {
    Eurobank,
    Management,
}

impl PortfolioType {
    /// Lowercase tag used in store file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioType::Eurobank => "eurobank",
            PortfolioType::Management => "management",
        }
    }

    /// Title-cased name for display.
    pub fn title(&self) -> &'static str {
        match self {
            PortfolioType::Eurobank => "Eurobank",
            PortfolioType::Management => "Management",
        }
    }
}

impl fmt::Display for PortfolioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PortfolioType {
    type Err = BillsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eurobank" => Ok(PortfolioType::Eurobank),
            "management" => Ok(PortfolioType::Management),
            _ => Err(BillsError::UnknownPortfolioType(s.to_string())),
        }
    }
}

/// Reporting month tag (YYYYMM) attached to every historical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProcessedMonth {
    year: i32,
    month: u32,
}

impl ProcessedMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, BillsError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(BillsError::InvalidProcessedMonth(format!(
                "{year:04}{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse from the integer form, e.g. `202403`.
    pub fn from_code(code: i64) -> Result<Self, BillsError> {
        let year = code / 100;
        let month = code % 100;
        let (Ok(year), Ok(month)) = (i32::try_from(year), u32::try_from(month)) else {
            return Err(BillsError::InvalidProcessedMonth(code.to_string()));
        };
        Self::new(year, month).map_err(|_| BillsError::InvalidProcessedMonth(code.to_string()))
    }

    /// Month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Integer code `YYYYMM`.
    pub fn code(&self) -> u32 {
        // year is bounded to four digits in the constructor
        (self.year as u32) * 100 + self.month
    }

    /// Chart label such as `Mar 2024`.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for ProcessedMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for ProcessedMonth {
    type Err = BillsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 6 || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(BillsError::InvalidProcessedMonth(s.to_string()));
        }
        let code: i64 = trimmed
            .parse()
            .map_err(|_| BillsError::InvalidProcessedMonth(s.to_string()))?;
        Self::from_code(code)
    }
}

impl TryFrom<u32> for ProcessedMonth {
    type Error = BillsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(value))
    }
}

impl From<ProcessedMonth> for u32 {
    fn from(value: ProcessedMonth) -> Self {
        value.code()
    }
}
