//! Shared utilities for Pofatu crates.
//!
//! This crate provides the leaf-level helpers used across the workspace:
//! the sentinel-aware measurement value parser and small text utilities
//! (slugs, semicolon lists, blank checks).

pub mod text;
pub mod value;

// Re-export commonly used functions at crate root for convenience
pub use text::{is_blank, non_empty, semicolon_split, slug};
pub use value::{
    MEASUREMENT_SENTINELS, ParsedValue, RawValue, ValueError, almost_float, format_decimal,
    is_sentinel, parse_sigma, parse_value,
};
