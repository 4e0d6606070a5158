//! Benchmark engine
//!
//! Drives the iteration loop on a dedicated blocking thread, runs the four
//! I/O phases in a fixed order, routes every sample to the aggregator and
//! the activity log, and exposes cooperative cancellation plus read-only
//! snapshots for observers on other threads.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bench::aggregator::ResultAggregator;
use crate::bench::logger::Logger;
use crate::config::RunConfig;
use crate::io::{FileIo, IoPrimitives, ScratchFile};
use crate::models::result::progress_fraction;
use crate::models::{EngineSnapshot, EngineStatus, LogEntry, Progress, TestKind, TestResult};
use crate::{DiskSpeedError, Result};

/// Mutable run state; written by `start`/`stop` and the loop thread
#[derive(Debug, Default)]
struct EngineState {
    status: EngineStatus,
    running: bool,
    current_iteration: u32,
    iterations: u32,
    token: CancellationToken,
}

impl EngineState {
    fn progress(&self) -> Progress {
        Progress {
            status: self.status,
            running: self.running,
            current_iteration: self.current_iteration,
            iterations: self.iterations,
        }
    }
}

/// Everything the loop thread needs, shared with the engine handle.
///
/// Lock order is always `state` before the logger or aggregator.
#[derive(Clone)]
struct Shared {
    io: Arc<dyn IoPrimitives>,
    scratch: ScratchFile,
    state: Arc<Mutex<EngineState>>,
    aggregator: ResultAggregator,
    logger: Logger,
    progress: Arc<watch::Sender<Progress>>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Send the current progress; callers hold the state lock so updates
    /// reach the channel in the order they were made
    fn publish(&self, state: &EngineState) {
        self.progress.send_replace(state.progress());
    }

    /// Body of the background task
    fn run(&self, config: RunConfig, token: CancellationToken) {
        if let Err(e) = self.scratch.prepare() {
            self.logger.log_error(e.to_string());
            self.mark_idle();
            return;
        }
        let path = self.scratch.path().to_path_buf();
        self.logger
            .log(format!("Using scratch file: {}", path.display()));

        let size_bytes = config.size_bytes();
        let mut completed = true;

        for iteration in 1..=config.iterations {
            if token.is_cancelled() {
                completed = false;
                break;
            }

            self.logger.log(format!("Starting iteration {}", iteration));

            for kind in TestKind::ALL {
                let mbps = self.run_phase(kind, size_bytes, &path);
                let result = self.aggregator.record(kind, mbps);
                let sample = result.samples().last().copied().unwrap_or_default();
                self.logger.log(format!(
                    "{}: {:.2} MB/s (min {:.2}, avg {:.2}, max {:.2})",
                    kind,
                    sample,
                    result.min(),
                    result.avg(),
                    result.max()
                ));
            }

            let mut state = self.lock_state();
            state.current_iteration = iteration;
            self.logger.log(format!("Completed iteration {}", iteration));
            self.publish(&state);
        }

        if completed {
            self.logger.log("All tests completed");
        }

        match self.scratch.remove() {
            Ok(()) => self
                .logger
                .log(format!("Removed scratch file: {}", path.display())),
            Err(e) => self.logger.log_error(e.to_string()),
        }

        self.mark_idle();
    }

    /// Run one timed primitive; failures are logged and count as a zero sample
    fn run_phase(&self, kind: TestKind, size_bytes: u64, path: &Path) -> f64 {
        let io = &self.io;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match kind {
            TestKind::SequentialWrite => io.sequential_write(size_bytes, path),
            TestKind::SequentialRead => io.sequential_read(path),
            TestKind::RandomWrite => io.random_write(size_bytes, path),
            TestKind::RandomRead => io.random_read(path),
        }))
        .unwrap_or_else(|_| {
            Err(io::Error::new(
                io::ErrorKind::Other,
                "I/O primitive panicked",
            ))
        });

        match outcome {
            Ok(mbps) => mbps,
            Err(e) => {
                let err = DiskSpeedError::IoPhaseError(format!("{} failed: {}", kind, e));
                self.logger.log_error(err.to_string());
                0.0
            }
        }
    }

    fn mark_idle(&self) {
        let mut state = self.lock_state();
        state.running = false;
        state.status = EngineStatus::Idle;
        self.publish(&state);
    }
}

/// Orchestrates benchmark runs.
///
/// One engine runs at most one loop at a time. All accessors return copies,
/// so they are safe to call from any thread while a run is in progress.
pub struct BenchmarkEngine {
    shared: Shared,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BenchmarkEngine {
    /// Engine using buffered file I/O and the default scratch path
    pub fn new() -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            shared: Shared {
                io: Arc::new(FileIo::new()),
                scratch: ScratchFile::default(),
                state: Arc::new(Mutex::new(EngineState::default())),
                aggregator: ResultAggregator::new(),
                logger: Logger::new(),
                progress: Arc::new(progress),
            },
            task: Mutex::new(None),
        }
    }

    /// Replace the I/O primitives
    pub fn with_io(mut self, io: Arc<dyn IoPrimitives>) -> Self {
        self.shared.io = io;
        self
    }

    /// Replace the scratch file location
    pub fn with_scratch_path(mut self, path: PathBuf) -> Self {
        self.shared.scratch = ScratchFile::new(path);
        self
    }

    /// Begin a run with the given payload size (MB) and iteration count.
    ///
    /// Must be called from within a tokio runtime; the loop itself runs on
    /// the runtime's blocking pool. Rejections are logged and returned, and
    /// leave results and state untouched.
    pub fn start(&self, file_size_mb: f64, iterations: u32) -> Result<()> {
        self.start_with(RunConfig::new(file_size_mb, iterations))
    }

    /// Begin a run from a prepared configuration
    pub fn start_with(&self, config: RunConfig) -> Result<()> {
        let shared = &self.shared;

        if let Err(e) = config.validate() {
            let detail = match &e {
                DiskSpeedError::ConfigError(msg) => msg.clone(),
                other => other.to_string(),
            };
            shared.logger.log_error(format!("Invalid configuration: {}", detail));
            return Err(e);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            let err = DiskSpeedError::BenchmarkError(format!("No async runtime available: {}", e));
            shared.logger.log_error(err.to_string());
            err
        })?;

        let token = CancellationToken::new();
        {
            let mut state = shared.lock_state();
            if state.status != EngineStatus::Idle {
                shared.logger.log("Benchmark already running");
                return Err(DiskSpeedError::AlreadyRunning);
            }

            shared.aggregator.reset();
            shared.logger.clear();

            state.status = EngineStatus::Running;
            state.running = true;
            state.current_iteration = 0;
            state.iterations = config.iterations;
            state.token = token.clone();

            shared.logger.log(format!(
                "Starting benchmark: {} MB, {} iterations",
                config.file_size_mb, config.iterations
            ));
            shared.publish(&state);
        }

        let worker = shared.clone();
        let handle = runtime.spawn_blocking(move || worker.run(config, token));
        *self.lock_task() = Some(handle);

        Ok(())
    }

    /// Request graceful cancellation.
    ///
    /// The current iteration finishes all four phases; no further iteration
    /// starts. No effect unless a run is in progress.
    pub fn stop(&self) {
        let shared = &self.shared;
        {
            let mut state = shared.lock_state();
            if state.status != EngineStatus::Running {
                return;
            }
            state.token.cancel();
            state.running = false;
            state.status = EngineStatus::Cancelling;
            shared.logger.log("Benchmark stopped by user");
            shared.publish(&state);
        }
    }

    /// Wait for the background loop of the latest run to exit
    pub async fn wait(&self) -> Result<()> {
        let handle = self.lock_task().take();
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| DiskSpeedError::BenchmarkError(format!("Benchmark task failed: {}", e)))?;
        }
        Ok(())
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.shared.progress.subscribe()
    }

    pub fn status(&self) -> EngineStatus {
        self.shared.lock_state().status
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock_state().running
    }

    pub fn current_iteration(&self) -> u32 {
        self.shared.lock_state().current_iteration
    }

    pub fn iterations(&self) -> u32 {
        self.shared.lock_state().iterations
    }

    /// Completed fraction of the run, clamped to `[0, 1]`
    pub fn progress(&self) -> f64 {
        let state = self.shared.lock_state();
        progress_fraction(state.current_iteration, state.iterations)
    }

    pub fn results(&self) -> [TestResult; 4] {
        self.shared.aggregator.snapshot()
    }

    pub fn result(&self, kind: TestKind) -> TestResult {
        self.shared.aggregator.get(kind)
    }

    /// Log lines formatted as `[HH:MM:SS] message`
    pub fn logs(&self) -> Vec<String> {
        self.shared.logger.lines()
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.shared.logger.entries()
    }

    pub fn scratch_path(&self) -> &Path {
        self.shared.scratch.path()
    }

    /// Copy of the whole observable surface
    pub fn snapshot(&self) -> EngineSnapshot {
        let progress = self.shared.lock_state().progress();
        EngineSnapshot {
            status: progress.status,
            running: progress.running,
            current_iteration: progress.current_iteration,
            iterations: progress.iterations,
            results: self.shared.aggregator.snapshot(),
            logs: self.shared.logger.lines(),
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for BenchmarkEngine {
    fn default() -> Self {
        Self::new()
    }
}
