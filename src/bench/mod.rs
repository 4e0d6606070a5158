//! Benchmark engine module
//!
//! Contains the run orchestrator together with the shared result store and
//! activity log it hands to its background thread.

pub mod aggregator;
pub mod engine;
pub mod logger;

// Re-export commonly used types
pub use aggregator::ResultAggregator;
pub use engine::BenchmarkEngine;
pub use logger::Logger;
