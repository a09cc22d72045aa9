use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillsError {
    #[error("unknown portfolio type '{0}' (expected eurobank or management)")]
    UnknownPortfolioType(String),
    #[error("invalid processed month '{0}' (expected YYYYMM)")]
    InvalidProcessedMonth(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, BillsError>;
