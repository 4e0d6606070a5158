//! Benchmark result data models
//!
//! Per-category sample history with incrementally maintained statistics,
//! activity log entries, and the immutable snapshot handed to observers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four test categories, in the order they run within an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestKind {
    SequentialWrite,
    SequentialRead,
    RandomWrite,
    RandomRead,
}

impl TestKind {
    /// All categories in phase order
    pub const ALL: [TestKind; 4] = [
        TestKind::SequentialWrite,
        TestKind::SequentialRead,
        TestKind::RandomWrite,
        TestKind::RandomRead,
    ];

    /// Human-readable identifier of the category
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::SequentialWrite => "Sequential Write",
            TestKind::SequentialRead => "Sequential Read",
            TestKind::RandomWrite => "Random Write",
            TestKind::RandomRead => "Random Read",
        }
    }

    /// Position of the category in [`TestKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            TestKind::SequentialWrite => 0,
            TestKind::SequentialRead => 1,
            TestKind::RandomWrite => 2,
            TestKind::RandomRead => 3,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sample history and derived statistics for one test category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Category this result belongs to
    pub kind: TestKind,
    /// Throughput samples in MB/s, in completion order
    samples: Vec<f64>,
    /// (original index, value) pairs sorted by value, ties by index
    sorted_index: Vec<(usize, f64)>,
    min: f64,
    max: f64,
    sum: f64,
}

impl TestResult {
    /// Create an empty result for a category
    pub fn new(kind: TestKind) -> Self {
        Self {
            kind,
            samples: Vec::new(),
            sorted_index: Vec::new(),
            min: 0.0,
            max: 0.0,
            sum: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sorted_index(&self) -> &[(usize, f64)] {
        &self.sorted_index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample, updating min/max/sum in O(1) and inserting into the
    /// sorted index after any equal values.
    pub fn push(&mut self, value: f64) {
        if self.samples.is_empty() {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;

        let index = self.samples.len();
        self.samples.push(value);

        let position = self.sorted_index.partition_point(|&(_, v)| v <= value);
        self.sorted_index.insert(position, (index, value));
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.samples.clear();
        self.sorted_index.clear();
        self.min = 0.0;
        self.max = 0.0;
        self.sum = 0.0;
    }

    /// Smallest sample, `0` when empty
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample, `0` when empty
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean, `0` when empty
    pub fn avg(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        // Rounding in the running sum can push the mean a few ulps outside
        // the observed range.
        (self.sum / self.samples.len() as f64).clamp(self.min, self.max)
    }

    /// Nearest-rank percentile (`p` in 0..=100), `0` when empty
    pub fn percentile(&self, p: f64) -> f64 {
        if self.sorted_index.is_empty() {
            return 0.0;
        }
        let p = p.clamp(0.0, 100.0);
        let rank = ((p / 100.0) * self.sorted_index.len() as f64).ceil() as usize;
        let idx = rank.saturating_sub(1).min(self.sorted_index.len() - 1);
        self.sorted_index[idx].1
    }

    /// One-line summary of the category statistics
    pub fn summary(&self) -> String {
        format!(
            "{}: min {:.2}, avg {:.2}, max {:.2} MB/s over {} samples",
            self.name(),
            self.min(),
            self.avg(),
            self.max(),
            self.len()
        )
    }
}

/// Timestamped activity log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Lifecycle state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineStatus {
    /// No run in progress
    #[default]
    Idle,
    /// Iteration loop executing
    Running,
    /// Stop requested; the current iteration is finishing
    Cancelling,
}

/// Run progress published to observers after every state change
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub status: EngineStatus,
    pub running: bool,
    pub current_iteration: u32,
    pub iterations: u32,
}

impl Progress {
    /// Completed fraction of the run, clamped to `[0, 1]`
    pub fn fraction(&self) -> f64 {
        progress_fraction(self.current_iteration, self.iterations)
    }
}

/// Immutable copy of everything an observer may read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub status: EngineStatus,
    pub running: bool,
    pub current_iteration: u32,
    pub iterations: u32,
    pub results: [TestResult; 4],
    /// Log lines formatted as `[HH:MM:SS] message`
    pub logs: Vec<String>,
}

impl EngineSnapshot {
    /// Completed fraction of the run, clamped to `[0, 1]`
    pub fn progress(&self) -> f64 {
        progress_fraction(self.current_iteration, self.iterations)
    }

    /// Result for a single category
    pub fn result(&self, kind: TestKind) -> &TestResult {
        &self.results[kind.index()]
    }
}

pub(crate) fn progress_fraction(current: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (current as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(samples: &[f64]) -> TestResult {
        let mut result = TestResult::new(TestKind::SequentialWrite);
        for &s in samples {
            result.push(s);
        }
        result
    }

    #[test]
    fn test_empty_result_reports_zero() {
        let result = TestResult::new(TestKind::RandomRead);
        assert!(result.is_empty());
        assert_eq!(result.min(), 0.0);
        assert_eq!(result.avg(), 0.0);
        assert_eq!(result.max(), 0.0);
        assert_eq!(result.percentile(50.0), 0.0);
        assert!(result.sorted_index().is_empty());
    }

    #[test]
    fn test_statistics_track_samples() {
        let result = result_with(&[120.0, 80.0, 100.0]);
        assert_eq!(result.min(), 80.0);
        assert_eq!(result.max(), 120.0);
        assert!((result.avg() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_min_avg_max_equal() {
        let result = result_with(&[42.5]);
        assert_eq!(result.min(), 42.5);
        assert_eq!(result.avg(), 42.5);
        assert_eq!(result.max(), 42.5);
    }

    #[test]
    fn test_avg_stays_within_range_under_rounding() {
        let result = result_with(&[0.1, 0.1, 0.1]);
        assert!(result.min() <= result.avg());
        assert!(result.avg() <= result.max());
    }

    #[test]
    fn test_min_avg_max_ordering_over_many_sequences() {
        let sequences: Vec<Vec<f64>> = vec![
            vec![0.0],
            vec![5.0, 0.0, 5.0],
            vec![1e-9, 1e9, 3.3, 3.3],
            (0..50).map(|i| ((i * 37) % 11) as f64 * 0.7).collect(),
        ];
        for seq in sequences {
            let result = result_with(&seq);
            assert!(result.min() <= result.avg(), "{:?}", seq);
            assert!(result.avg() <= result.max(), "{:?}", seq);
        }
    }

    #[test]
    fn test_sorted_index_is_sorted_permutation() {
        let samples = [30.0, 10.0, 20.0, 10.0, 40.0, 20.0];
        let result = result_with(&samples);

        assert_eq!(result.sorted_index().len(), samples.len());

        let mut seen: Vec<usize> = result.sorted_index().iter().map(|&(i, _)| i).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..samples.len()).collect::<Vec<_>>());

        for &(i, v) in result.sorted_index() {
            assert_eq!(samples[i], v);
        }
        for pair in result.sorted_index().windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_sorted_index_ties_keep_insertion_order() {
        let result = result_with(&[5.0, 3.0, 5.0, 3.0, 5.0]);
        assert_eq!(
            result.sorted_index(),
            &[(1, 3.0), (3, 3.0), (0, 5.0), (2, 5.0), (4, 5.0)]
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut result = result_with(&[1.0, 2.0]);
        result.clear();
        assert!(result.is_empty());
        assert!(result.sorted_index().is_empty());
        assert_eq!(result.min(), 0.0);
        assert_eq!(result.max(), 0.0);
        assert_eq!(result.avg(), 0.0);

        result.push(7.0);
        assert_eq!(result.min(), 7.0);
        assert_eq!(result.max(), 7.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let result = result_with(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(result.percentile(0.0), 10.0);
        assert_eq!(result.percentile(25.0), 10.0);
        assert_eq!(result.percentile(50.0), 20.0);
        assert_eq!(result.percentile(75.0), 30.0);
        assert_eq!(result.percentile(100.0), 40.0);
    }

    #[test]
    fn test_test_kind_order_and_names() {
        let names: Vec<&str> = TestKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec!["Sequential Write", "Sequential Read", "Random Write", "Random Read"]
        );
        for (i, kind) in TestKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_log_entry_format() {
        let entry = LogEntry::now("Starting iteration 1");
        let line = entry.to_string();
        assert!(line.starts_with('['));
        assert_eq!(&line[9..11], "] ");
        assert!(line.ends_with("Starting iteration 1"));
    }

    #[test]
    fn test_progress_fraction_clamped() {
        assert_eq!(progress_fraction(0, 0), 0.0);
        assert_eq!(progress_fraction(1, 4), 0.25);
        assert_eq!(progress_fraction(4, 4), 1.0);
        assert_eq!(progress_fraction(9, 4), 1.0);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snapshot = EngineSnapshot {
            status: EngineStatus::Idle,
            running: false,
            current_iteration: 1,
            iterations: 2,
            results: TestKind::ALL.map(TestResult::new),
            logs: vec!["[12:00:00] Starting iteration 1".to_string()],
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize to JSON");
        assert!(json.contains("SequentialWrite"));

        let restored: EngineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.current_iteration, 1);
        assert_eq!(restored.progress(), 0.5);
    }
}
