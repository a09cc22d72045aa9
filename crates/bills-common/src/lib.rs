//! Shared utilities for the utility-bill workspace.
//!
//! This crate provides the polars cell helpers every other crate uses to read
//! keys and amounts out of text-typed portfolio tables.

pub mod cells;

pub use cells::{
    any_to_f64, any_to_i64, any_to_key, any_to_string, cell, cell_key, format_numeric,
    is_missing, is_missing_text, parse_f64, parse_i64,
};
