#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod paths;

pub use crate::error::{Result, StandardsError};
pub use crate::loader::{load_default_schema, load_schema, parse_schema, validate_schema};
pub use crate::paths::{PORTFOLIO_SCHEMA_FILE, SCHEMA_ENV_VAR, portfolio_schema_path, schema_root};
