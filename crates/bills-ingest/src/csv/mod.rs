//! CSV reading and writing.

mod header;
mod reader;
mod writer;

pub use header::{normalize_header, parse_header_line};
pub use reader::{read_header, read_table, reject_workbook, validate_encoding};
pub use writer::write_table;
