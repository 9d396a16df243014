//! Compiled regex patterns for normalizing project directory names.
//!
//! Compiled once on first use and reused for every resolved directory.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing worktree suffix such as `-wt-1` or `-wt-12`.
pub static RE_WORKTREE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-wt-\d+$").unwrap());
