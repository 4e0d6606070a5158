//! Routes samples into the per-category results

use crate::models::{TestKind, TestResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Shared owner of the four [`TestResult`]s.
///
/// The sample and its sorted-index entry are inserted under one write lock,
/// so a reader either sees both or neither.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    results: Arc<RwLock<[TestResult; 4]>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(TestKind::ALL.map(TestResult::new))),
        }
    }

    /// Append a sample to its category and return the updated result
    pub fn record(&self, kind: TestKind, mbps: f64) -> TestResult {
        let value = if mbps.is_finite() {
            mbps
        } else {
            warn!(test = kind.name(), value = mbps, "non-finite sample recorded as 0");
            0.0
        };

        let mut results = self.write();
        let result = &mut results[kind.index()];
        result.push(value);
        result.clone()
    }

    /// Empty all four categories
    pub fn reset(&self) {
        for result in self.write().iter_mut() {
            result.clear();
        }
    }

    /// Copy of a single category
    pub fn get(&self, kind: TestKind) -> TestResult {
        self.read()[kind.index()].clone()
    }

    /// Copy of all four categories in phase order
    pub fn snapshot(&self) -> [TestResult; 4] {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, [TestResult; 4]> {
        self.results.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, [TestResult; 4]> {
        self.results.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
