//! Configuration management module
//!
//! Handles validation of run parameters and loading/saving the default
//! parameters from the settings file.

use crate::{DiskSpeedError, Result, APP_NAME, BYTES_PER_MB, CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters for one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Scratch payload size in megabytes (MiB)
    pub file_size_mb: f64,
    /// Number of four-phase cycles to execute
    pub iterations: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            file_size_mb: 256.0,
            iterations: 3,
        }
    }
}

impl RunConfig {
    /// Create a run configuration; call [`RunConfig::validate`] before use
    pub fn new(file_size_mb: f64, iterations: u32) -> Self {
        Self {
            file_size_mb,
            iterations,
        }
    }

    /// Validate the run parameters
    pub fn validate(&self) -> Result<()> {
        if !self.file_size_mb.is_finite() {
            return Err(DiskSpeedError::ConfigError(format!(
                "File size must be a finite number, got {}",
                self.file_size_mb
            )));
        }

        if self.file_size_mb <= 0.0 {
            return Err(DiskSpeedError::ConfigError(format!(
                "File size must be greater than 0 MB, got {}",
                self.file_size_mb
            )));
        }

        if self.iterations == 0 {
            return Err(DiskSpeedError::ConfigError(
                "Iterations must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Payload size in bytes handed to every I/O phase
    pub fn size_bytes(&self) -> u64 {
        (self.file_size_mb * BYTES_PER_MB) as u64
    }

    /// Set the file size in megabytes
    pub fn with_file_size_mb(mut self, file_size_mb: f64) -> Self {
        self.file_size_mb = file_size_mb;
        self
    }

    /// Set the number of iterations
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Load defaults from the standard settings file location.
    /// Returns the built-in defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load and validate a settings file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DiskSpeedError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            DiskSpeedError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save to the standard settings file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Validate and write the settings file at an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DiskSpeedError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| {
            DiskSpeedError::ConfigError(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard settings file path
    /// Uses $CONFIG_HOME/diskspeed/diskspeed.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            DiskSpeedError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_file_size() {
        for size in [0.0, -1.0, -0.5] {
            let result = RunConfig::new(size, 1).validate();
            assert!(matches!(result, Err(DiskSpeedError::ConfigError(_))));
        }
    }

    #[test]
    fn test_rejects_non_finite_file_size() {
        for size in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = RunConfig::new(size, 1).validate();
            assert!(matches!(result, Err(DiskSpeedError::ConfigError(_))));
        }
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let result = RunConfig::new(1.0, 0).validate();
        assert!(matches!(result, Err(DiskSpeedError::ConfigError(msg)) if msg.contains("Iterations")));
    }

    #[test]
    fn test_size_bytes() {
        assert_eq!(RunConfig::new(1.0, 1).size_bytes(), 1024 * 1024);
        assert_eq!(RunConfig::new(0.5, 1).size_bytes(), 512 * 1024);
        assert_eq!(RunConfig::new(1.5, 1).size_bytes(), 1536 * 1024);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = RunConfig::default()
            .with_file_size_mb(64.0)
            .with_iterations(7);
        config.save_to(&path).unwrap();

        let loaded = RunConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let loaded = RunConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, RunConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "file_size_mb = -4.0\niterations = 2\n").unwrap();

        assert!(matches!(
            RunConfig::load_from(&path),
            Err(DiskSpeedError::ConfigError(_))
        ));
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        assert!(RunConfig::new(1.0, 0).save_to(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_config_file_path() {
        let path = RunConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("diskspeed"));
        assert!(path.to_string_lossy().ends_with("diskspeed.toml"));
    }
}
