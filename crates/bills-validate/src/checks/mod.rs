//! Validation check modules.
//!
//! Each module performs one check of the validation pipeline. Checks are
//! pure: they return what they found and never fail on bad data.

mod columns;
mod duplicates;
mod empty_rows;
mod mandatory;

pub use columns::check_columns;
pub use duplicates::{DuplicateSet, find_duplicates};
pub use empty_rows::drop_fully_empty_rows;
pub use mandatory::check_mandatory_filled;
