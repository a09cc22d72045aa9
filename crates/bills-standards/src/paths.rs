//! Schema directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the schema directory.
pub const SCHEMA_ENV_VAR: &str = "BILLS_SCHEMA_DIR";

/// File name of the monthly portfolio schema.
pub const PORTFOLIO_SCHEMA_FILE: &str = "portfolio.toml";

/// Get the schema root directory.
///
/// Resolution order:
/// 1. `BILLS_SCHEMA_DIR` environment variable
/// 2. `schema/` directory relative to workspace root
pub fn schema_root() -> PathBuf {
    if let Ok(root) = std::env::var(SCHEMA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schema")
}

/// Path of the default portfolio schema file.
pub fn portfolio_schema_path() -> PathBuf {
    schema_root().join(PORTFOLIO_SCHEMA_FILE)
}
