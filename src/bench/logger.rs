//! Activity log shared between the benchmark thread and observers

use crate::models::LogEntry;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Append-only, timestamped event log.
///
/// Clones share the same entries. An entry is pushed under the lock with its
/// timestamp and message together, so readers never see half of one.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time
    pub fn log(&self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        info!(target: "diskspeed::activity", "{}", entry.message);
        self.lock().push(entry);
    }

    /// Append a failure message; mirrored to tracing at warn level
    pub fn log_error(&self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        warn!(target: "diskspeed::activity", "{}", entry.message);
        self.lock().push(entry);
    }

    /// Copy of all entries in emission order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Entries formatted as `[HH:MM:SS] message`
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Only called by the engine between runs
    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
