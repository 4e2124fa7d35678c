//! Utility functions for string formatting.

pub mod format;

pub use format::{format_date, preview, truncate_string};
