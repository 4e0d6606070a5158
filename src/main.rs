use diskspeed::config::RunConfig;
use diskspeed::simple::{ask_config, export_json, render_results, run_console};
use diskspeed::{error, BenchmarkEngine, Result};
use std::io::Write;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("{}", error::user_friendly_message(&e));
        if error::prevents_run(&e) {
            eprintln!("No benchmark was run.");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut config = RunConfig::load().unwrap_or_else(|e| {
        warn!("Falling back to default settings: {}", e);
        RunConfig::default()
    });

    println!(
        "Settings: {} MB per phase, {} iterations",
        config.file_size_mb, config.iterations
    );
    println!("Press Enter to accept or type 'c' to change:");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    if input.trim().eq_ignore_ascii_case("c") {
        config = ask_config(config)?;
        if let Err(e) = config.save() {
            warn!("Could not save settings: {}", e);
        }
    }

    let engine = BenchmarkEngine::new();
    let snapshot = run_console(&engine, config).await?;

    println!();
    print!("{}", render_results(&snapshot));
    println!("\nActivity log:");
    for line in &snapshot.logs {
        println!("  {}", line);
    }

    print!("\nSave results as JSON (path, blank to skip): ");
    std::io::stdout().flush()?;
    input.clear();
    std::io::stdin().read_line(&mut input)?;
    let path = input.trim();
    if !path.is_empty() {
        std::fs::write(path, export_json(&snapshot)?)?;
        println!("Results written to {}", path);
    }

    Ok(())
}
