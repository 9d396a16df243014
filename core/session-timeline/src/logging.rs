//! Logging setup for the CLI.
//!
//! Stdout carries the JSON report, so all logs go to stderr.

use std::env;
use tracing_subscriber::EnvFilter;

/// Forces debug logging when set to a truthy value.
const DEBUG_LOG_ENV: &str = "SESSION_TIMELINE_DEBUG_LOG";

pub fn init() {
    let filter = if debug_enabled(env::var(DEBUG_LOG_ENV).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}
