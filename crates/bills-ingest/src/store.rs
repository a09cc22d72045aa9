//! On-disk layout of the per-portfolio historical store and master registry.

use std::path::{Path, PathBuf};

use bills_model::PortfolioType;
use polars::prelude::DataFrame;

use crate::csv::read_table;
use crate::error::{IngestError, Result};

/// Environment variable for overriding the data directory.
pub const DATA_ENV_VAR: &str = "BILLS_DATA_DIR";

/// Data directory used when neither a flag nor the environment names one.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Name of the directory merged tables are exported to.
pub const EXPORT_DIR: &str = "exports";

/// Resolves store paths under one data directory.
///
/// ```text
/// {root}/{type}_historical_db.csv
/// {root}/{type}_masterfile.csv
/// {root}/exports/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolution order: explicit directory, `BILLS_DATA_DIR`, `data/`.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(dir) = explicit {
            return Self::new(dir);
        }
        match std::env::var(DATA_ENV_VAR) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn historical_path(&self, kind: PortfolioType) -> PathBuf {
        self.root.join(format!("{}_historical_db.csv", kind.as_str()))
    }

    pub fn registry_path(&self, kind: PortfolioType) -> PathBuf {
        self.root.join(format!("{}_masterfile.csv", kind.as_str()))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join(EXPORT_DIR)
    }

    /// Loads the historical time series of one portfolio type.
    pub fn load_history(&self, kind: PortfolioType) -> Result<DataFrame> {
        let path = self.historical_path(kind);
        tracing::debug!(kind = %kind, path = %path.display(), "loading historical store");
        load_store_file(&path)
    }

    /// Loads the master registry of one portfolio type.
    pub fn load_registry(&self, kind: PortfolioType) -> Result<DataFrame> {
        let path = self.registry_path(kind);
        tracing::debug!(kind = %kind, path = %path.display(), "loading master registry");
        load_store_file(&path)
    }
}

/// Reads a store CSV. When only a workbook of the same name exists, the error
/// names it and the CSV it should be exported to.
fn load_store_file(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        let workbook = path.with_extension("xlsx");
        if workbook.exists() {
            return Err(IngestError::Workbook {
                path: workbook,
                csv: path.to_path_buf(),
            });
        }
    }
    read_table(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_per_type() {
        let layout = StoreLayout::new("/srv/bills");
        assert_eq!(
            layout.historical_path(PortfolioType::Eurobank),
            PathBuf::from("/srv/bills/eurobank_historical_db.csv")
        );
        assert_eq!(
            layout.registry_path(PortfolioType::Management),
            PathBuf::from("/srv/bills/management_masterfile.csv")
        );
        assert_eq!(layout.export_dir(), PathBuf::from("/srv/bills/exports"));
    }

    #[test]
    fn test_explicit_dir_wins() {
        let layout = StoreLayout::resolve(Some(Path::new("/tmp/store")));
        assert_eq!(layout.root(), Path::new("/tmp/store"));
    }
}
