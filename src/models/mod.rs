//! Data models module
//!
//! Contains per-category results, log entries, and the engine state
//! snapshots read by observers.

pub mod result;

// Re-export commonly used types
pub use result::{
    EngineSnapshot,
    EngineStatus,
    LogEntry,
    Progress,
    TestKind,
    TestResult,
};
