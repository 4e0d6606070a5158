//! Utility functions module
//!
//! Contains helpers for throughput arithmetic and units formatting.

pub mod units;

// Re-export commonly used functions
pub use units::{calculate_throughput_mbps, format_bytes, format_throughput};
