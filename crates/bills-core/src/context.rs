use bills_model::{PortfolioSchema, PortfolioType, ProcessedMonth};
use chrono::NaiveDate;

/// Inputs shared by every step of one ingestion session.
#[derive(Debug, Clone, Copy)]
pub struct IngestContext<'a> {
    pub schema: &'a PortfolioSchema,
    pub portfolio_type: PortfolioType,
    /// Month new rows are tagged with.
    pub processed_month: ProcessedMonth,
    /// Date stamped into the suggested export file name.
    pub export_date: NaiveDate,
}

impl<'a> IngestContext<'a> {
    pub fn new(
        schema: &'a PortfolioSchema,
        portfolio_type: PortfolioType,
        processed_month: ProcessedMonth,
        export_date: NaiveDate,
    ) -> Self {
        Self {
            schema,
            portfolio_type,
            processed_month,
            export_date,
        }
    }

    /// `{type}_historical_db_{YYYYMMDD}.csv`
    pub fn export_file_name(&self) -> String {
        export_file_name(self.portfolio_type, self.export_date)
    }
}

pub fn export_file_name(portfolio_type: PortfolioType, date: NaiveDate) -> String {
    format!(
        "{}_historical_db_{}.csv",
        portfolio_type.as_str(),
        date.format("%Y%m%d")
    )
}
