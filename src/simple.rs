use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::bench::BenchmarkEngine;
use crate::config::RunConfig;
use crate::models::{EngineSnapshot, EngineStatus, TestKind};
use crate::util::{format_bytes, format_throughput};
use crate::{DiskSpeedError, Result};

/// Prompt the user for run parameter overrides on stdin.
pub fn ask_config(config: RunConfig) -> Result<RunConfig> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    read_config(config, &mut stdin.lock(), &mut stdout)
}

/// Read overrides from `input`; blank or unparsable answers keep the current value.
pub fn read_config<R: BufRead, W: Write>(
    mut config: RunConfig,
    input: &mut R,
    output: &mut W,
) -> Result<RunConfig> {
    let mut line = String::new();

    write!(output, "File size in MB (default {}): ", config.file_size_mb)?;
    output.flush()?;
    input.read_line(&mut line)?;
    if let Ok(v) = line.trim().parse::<f64>() {
        config.file_size_mb = v;
    }

    line.clear();
    write!(output, "Iterations (default {}): ", config.iterations)?;
    output.flush()?;
    input.read_line(&mut line)?;
    if let Ok(v) = line.trim().parse::<u32>() {
        config.iterations = v;
    }

    config.validate()?;
    Ok(config)
}

/// Run a benchmark to completion, rendering progress and forwarding Ctrl-C to `stop`.
pub async fn run_console(engine: &BenchmarkEngine, config: RunConfig) -> Result<EngineSnapshot> {
    let mut rx = engine.subscribe();
    let started = Instant::now();
    engine.start_with(config)?;

    println!(
        "Payload per phase: {}, scratch file: {}",
        format_bytes(config.size_bytes()),
        engine.scratch_path().display()
    );

    let pb = ProgressBar::new(u64::from(config.iterations));
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} iterations {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let progress = *rx.borrow_and_update();
                pb.set_position(u64::from(progress.current_iteration));
                if let Some(entry) = engine.log_entries().last() {
                    pb.set_message(entry.message.clone());
                }
                if progress.status == EngineStatus::Idle {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    pb.println("Stopping after the current iteration...");
                    engine.stop();
                }
            }
        }
    }

    engine.wait().await?;
    pb.finish_and_clear();

    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    println!("Finished in {}", humantime::format_duration(elapsed));

    Ok(engine.snapshot())
}

/// Statistics table for the four categories
pub fn render_results(snapshot: &EngineSnapshot) -> String {
    let mut out = format!(
        "{:<18} {:>12} {:>12} {:>12} {:>12} {:>8}\n",
        "Test", "Min", "Avg", "Max", "p50", "Samples"
    );
    for kind in TestKind::ALL {
        let result = snapshot.result(kind);
        out.push_str(&format!(
            "{:<18} {:>12} {:>12} {:>12} {:>12} {:>8}\n",
            kind.name(),
            format_throughput(result.min()),
            format_throughput(result.avg()),
            format_throughput(result.max()),
            format_throughput(result.percentile(50.0)),
            result.len()
        ));
    }
    out
}

/// Snapshot as pretty-printed JSON
pub fn export_json(snapshot: &EngineSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|e| DiskSpeedError::BenchmarkError(format!("Failed to export results: {}", e)))
}
