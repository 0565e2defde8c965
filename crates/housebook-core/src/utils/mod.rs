//! Utility functions for string formatting and manipulation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{age_display, contains_ignore_case, format_size, truncate};
