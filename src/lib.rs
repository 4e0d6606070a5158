//! diskspeed - iterative storage throughput benchmark
//!
//! Runs sequential write, sequential read, random write and random read
//! phases against a scratch file for a configurable number of iterations,
//! keeping per-category sample statistics and a timestamped activity log
//! that any front end can observe while the run is in progress.

use std::fmt;

// Public re-exports
pub mod bench;
pub mod config;
pub mod io;
pub mod models;
pub mod simple;
pub mod util;

pub use bench::BenchmarkEngine;
pub use config::RunConfig;
pub use models::{EngineSnapshot, EngineStatus, TestKind, TestResult};

// Common error types
#[derive(Debug)]
pub enum DiskSpeedError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Run parameters or settings file are invalid
    ConfigError(String),
    /// Scratch file could not be created or removed
    ScratchFileError(String),
    /// A timed I/O phase failed
    IoPhaseError(String),
    /// A run is already in progress on this engine
    AlreadyRunning,
    /// Benchmark execution error
    BenchmarkError(String),
    /// Permission denied for disk operations
    PermissionDenied(String),
}

impl fmt::Display for DiskSpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskSpeedError::IoError(err) => write!(f, "I/O error: {}", err),
            DiskSpeedError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DiskSpeedError::ScratchFileError(msg) => write!(f, "Scratch file error: {}", msg),
            DiskSpeedError::IoPhaseError(msg) => write!(f, "I/O phase error: {}", msg),
            DiskSpeedError::AlreadyRunning => write!(f, "Benchmark already running"),
            DiskSpeedError::BenchmarkError(msg) => write!(f, "Benchmark error: {}", msg),
            DiskSpeedError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for DiskSpeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiskSpeedError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DiskSpeedError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                DiskSpeedError::PermissionDenied(format!("Access denied: {}", err))
            }
            _ => DiskSpeedError::IoError(err),
        }
    }
}

impl From<toml::de::Error> for DiskSpeedError {
    fn from(err: toml::de::Error) -> Self {
        DiskSpeedError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for DiskSpeedError {
    fn from(err: toml::ser::Error) -> Self {
        DiskSpeedError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for diskspeed operations
pub type Result<T> = std::result::Result<T, DiskSpeedError>;

/// Error handling utilities
pub mod error {
    use super::DiskSpeedError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &DiskSpeedError) -> String {
        match error {
            DiskSpeedError::PermissionDenied(_) => {
                "Permission denied. Check that the temporary directory is writable.".to_string()
            }
            DiskSpeedError::ScratchFileError(_) => {
                "Failed to prepare the scratch file. Check disk space and permissions.".to_string()
            }
            DiskSpeedError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            DiskSpeedError::AlreadyRunning => {
                "A benchmark is already running. Stop it or wait for it to finish.".to_string()
            }
            _ => error.to_string(),
        }
    }

    /// Whether the error means the run never started
    pub fn prevents_run(error: &DiskSpeedError) -> bool {
        matches!(
            error,
            DiskSpeedError::ConfigError(_)
                | DiskSpeedError::ScratchFileError(_)
                | DiskSpeedError::AlreadyRunning
                | DiskSpeedError::BenchmarkError(_)
        )
    }
}

// Common types and constants
pub const APP_NAME: &str = "diskspeed";
pub const CONFIG_FILE: &str = "diskspeed.toml";
pub const SCRATCH_FILE_NAME: &str = "diskspeed_scratch.tmp";
/// Block size for random-access phases; not configurable.
pub const BLOCK_SIZE: u64 = 4096;
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
