//! Portfolio table loading and persistence.
//!
//! Monthly uploads, the historical time series and the master registry are
//! flat CSV files. This crate reads them into Polars DataFrames with every
//! column typed as text and writes merged tables back out.
//!
//! # Example
//!
//! ```ignore
//! use bills_ingest::{StoreLayout, read_table};
//! use bills_model::PortfolioType;
//!
//! let layout = StoreLayout::resolve(None);
//! let upload = read_table(Path::new("eurobank_2024_03.csv"))?;
//! let history = layout.load_history(PortfolioType::Eurobank)?;
//! ```

mod csv;
mod error;
mod store;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading and Writing ===
pub use csv::{
    normalize_header, parse_header_line, read_header, read_table, reject_workbook, validate_encoding,
    write_table,
};

// === Store Layout ===
pub use store::{DATA_ENV_VAR, DEFAULT_DATA_DIR, EXPORT_DIR, StoreLayout};
