use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::{IngestError, Result};

/// Writes a table as UTF-8 CSV with a header row, creating parent directories.
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut out = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)?;
    tracing::debug!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}
