//! Run configuration for a single timeline report.
//!
//! Everything the pipeline needs is carried in `TimelineConfig`; nothing is
//! read from the environment after construction.

use std::env;
use std::path::PathBuf;

/// Environment variable holding the colon-separated list of directories to scan.
pub const PROJECT_DIRS_ENV: &str = "PROJECT_DIRS";

/// Number of sessions reported when no count is given.
pub const DEFAULT_SESSION_COUNT: usize = 10;

/// Idle intervals longer than this many minutes get a gap marker.
pub const DEFAULT_GAP_THRESHOLD_MINUTES: i64 = 30;

/// Fixed display offset from UTC (GMT+7).
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineConfig {
    /// Directories holding `*.jsonl` session logs and an optional `sessions-index.json`.
    pub project_dirs: Vec<PathBuf>,
    /// Maximum number of sessions to report.
    pub count: usize,
    pub gap_threshold_minutes: i64,
    pub display_offset_hours: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            project_dirs: Vec::new(),
            count: DEFAULT_SESSION_COUNT,
            gap_threshold_minutes: DEFAULT_GAP_THRESHOLD_MINUTES,
            display_offset_hours: DEFAULT_DISPLAY_OFFSET_HOURS,
        }
    }
}

impl TimelineConfig {
    /// Builds a config from `PROJECT_DIRS`, falling back to defaults for everything else.
    pub fn from_env() -> Self {
        let raw = env::var(PROJECT_DIRS_ENV).unwrap_or_default();
        Self::default().with_project_dirs(parse_project_dirs(&raw))
    }

    pub fn with_project_dirs(mut self, project_dirs: Vec<PathBuf>) -> Self {
        self.project_dirs = project_dirs;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_gap_threshold_minutes(mut self, minutes: i64) -> Self {
        self.gap_threshold_minutes = minutes;
        self
    }
}

/// Splits a colon-separated directory list, dropping empty entries.
pub fn parse_project_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .filter(|entry| !entry.is_empty())
        .map(expand_home)
        .collect()
}

/// Expands a leading `~` to the home directory; other paths pass through.
fn expand_home(entry: &str) -> PathBuf {
    let rest = match entry.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return PathBuf::from(entry),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches('/')),
        None => PathBuf::from(entry),
    }
}
