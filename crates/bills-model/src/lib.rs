pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod portfolio;
pub mod schema;

pub use diagnostics::{Issue, IssueKind, IssueSeverity, error_count, warning_count};
pub use error::{BillsError, Result};
pub use filter::FilterLevel;
pub use portfolio::{PortfolioType, ProcessedMonth};
pub use schema::{CONSUMPTION_TIER_COUNT, ColumnRoles, PortfolioSchema};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_counts() {
        let issues = vec![
            Issue::new(IssueKind::MissingColumns, "missing columns: ΑΦΜ")
                .with_columns(vec!["ΑΦΜ".to_string()]),
            Issue::new(IssueKind::EmptyRows, "2 completely empty rows dropped").with_count(2),
            Issue::new(IssueKind::InactiveSupply, "3 registered supply ids absent").with_count(3),
        ];
        assert_eq!(error_count(&issues), 1);
        assert_eq!(warning_count(&issues), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn issue_serializes() {
        let issue = Issue::new(IssueKind::DuplicateInvoices, "2 duplicate rows").with_count(2);
        let json = serde_json::to_string(&issue).expect("serialize issue");
        assert!(json.contains("\"kind\":\"duplicate_invoices\""));
        assert!(json.contains("\"severity\":\"error\""));
        assert!(!json.contains("columns"));
        let round: Issue = serde_json::from_str(&json).expect("deserialize issue");
        assert_eq!(round, issue);
    }
}
