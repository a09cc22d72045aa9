//! CSV file reading.
//!
//! Every column is read as text so that monthly files, the historical store
//! and in-memory frames always share one dtype per column.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, PlSmallStr, SerReader};

use crate::error::{IngestError, Result};

use super::header::{normalize_header, parse_header_line};

/// Rejects UTF-16 exports; a UTF-8 byte order mark is fine.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::open(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Workbook extensions that polars cannot read as CSV.
const WORKBOOK_EXTENSIONS: [&str; 3] = ["xlsx", "xlsm", "xls"];

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Rejects `.xlsx`/`.xls` files with a hint naming the CSV to export.
pub fn reject_workbook(path: &Path) -> Result<()> {
    if is_workbook(path) {
        return Err(IngestError::Workbook {
            path: path.to_path_buf(),
            csv: path.with_extension("csv"),
        });
    }
    Ok(())
}

/// Reads the header line of a CSV file.
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let bytes = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    if bytes == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns = parse_header_line(line.trim_end_matches(['\r', '\n']));
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    if columns.iter().any(String::is_empty) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(columns)
}

/// Reads a CSV table into a DataFrame with every column typed as String.
///
/// Empty fields become nulls. Column names are normalized the same way as
/// [`read_header`] so a byte order mark never leaks into the first name.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    reject_workbook(path)?;
    validate_encoding(path)?;
    let header = read_header(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let raw_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for raw in raw_names {
        let normalized = normalize_header(&raw);
        if normalized != raw {
            df.rename(&raw, PlSmallStr::from(normalized.as_str()))?;
        }
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        header_columns = header.len(),
        "read table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_header_empty_file() {
        let file = create_temp_csv(b"");
        let err = read_header(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyCsv { .. }));
    }

    #[test]
    fn test_read_header_blank_line() {
        let file = create_temp_csv(b",,\n1,2,3\n");
        let err = read_header(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoHeaderDetected { .. }));
    }

    #[test]
    fn test_read_header_blank_column() {
        let file = create_temp_csv(b"A,,C\n1,2,3\n");
        let err = read_header(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyColumnName { .. }));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0x00]);
        let err = validate_encoding(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn test_read_table_strips_bom() {
        let file = create_temp_csv("\u{feff}ΑΡ.ΠΑΡΟΧΗΣ,ΟΦΕΙΛΗ\n1002003,12.5\n".as_bytes());
        let df = read_table(file.path()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["ΑΡ.ΠΑΡΟΧΗΣ", "ΟΦΕΙΛΗ"]);
    }
}
