//! CLI library components for the utility-bill pipeline.

pub mod logging;
pub mod progress;
