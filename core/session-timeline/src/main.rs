//! session-timeline: chronological report of coding-assistant sessions.
//!
//! Scans the directories listed in `PROJECT_DIRS` for `*.jsonl` session logs,
//! picks the most recent ones, and prints a JSON timeline with idle gaps
//! between sessions.
//!
//! ## Environment
//!
//! - `PROJECT_DIRS`: colon-separated directories to scan
//! - `SESSION_TIMELINE_DEBUG_LOG=1`: debug logging to stderr
//! - `RUST_LOG`: standard filter when debug logging is off (default: warn)

mod logging;

use clap::Parser;
use std::io::{self, Write};
use timeline_core::config::DEFAULT_SESSION_COUNT;
use timeline_core::{render_json, GhqRepoLister, TimelineConfig, TimelineEngine};

#[derive(Parser)]
#[command(name = "session-timeline")]
#[command(about = "Render a timeline of recent coding-assistant sessions as JSON")]
#[command(version)]
struct Cli {
    /// Number of most recent sessions to report
    #[arg(value_name = "COUNT", default_value_t = DEFAULT_SESSION_COUNT)]
    count: usize,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.count) {
        tracing::error!(error = %e, "session-timeline failed");
        std::process::exit(1);
    }
}

fn run(count: usize) -> Result<(), String> {
    let config = TimelineConfig::from_env().with_count(count);
    tracing::debug!(
        dirs = config.project_dirs.len(),
        count = config.count,
        "Starting session scan"
    );

    let engine = TimelineEngine::new(config, &GhqRepoLister::default());
    let json = render_json(&engine.build_timeline()).map_err(|e| e.to_string())?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", json).map_err(|e| format!("Failed to write report: {}", e))?;
    Ok(())
}
