//! Error types for portfolio file loading and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing portfolio tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Table file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File starts with a UTF-16 byte order mark.
    #[error("unsupported encoding {encoding} in {path}; save the export as UTF-8 CSV")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Spreadsheet workbook where a CSV export is expected.
    #[error("{path} is a spreadsheet workbook; save it as UTF-8 CSV ({csv})")]
    Workbook { path: PathBuf, csv: PathBuf },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no content at all.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// First line holds no column names.
    #[error("could not detect header row in {path}")]
    NoHeaderDetected { path: PathBuf },

    /// A header cell is blank.
    #[error("blank column name in {path}")]
    EmptyColumnName { path: PathBuf },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/eurobank_historical_db.csv"),
        };
        assert_eq!(
            err.to_string(),
            "file not found: /data/eurobank_historical_db.csv"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("ΟΦΕΙΛΗ".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }

    #[test]
    fn test_open_maps_not_found() {
        let err = IngestError::open(
            std::path::Path::new("missing.csv"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, IngestError::FileNotFound { .. }));
        let err = IngestError::open(
            std::path::Path::new("locked.csv"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
