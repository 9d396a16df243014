//! Session log discovery across project directories.
//!
//! Session ids are file names, and the same session can appear in more than
//! one directory (worktrees, copied projects). Only the most recently modified
//! copy of each file name is kept.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// File extension of session logs.
pub const SESSION_LOG_EXTENSION: &str = "jsonl";

/// A session log chosen for the report, with the directory it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub source_dir: PathBuf,
    pub modified: SystemTime,
}

impl SelectedFile {
    /// File name without the `.jsonl` extension.
    pub fn session_id(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Returns up to `count` most recently modified session logs, one per file name.
///
/// On a file name collision the copy with the strictly later modification
/// time wins; the first one seen wins ties. Unreadable directories
/// contribute nothing.
pub fn select_recent_files(project_dirs: &[PathBuf], count: usize) -> Vec<SelectedFile> {
    let mut by_name: BTreeMap<String, SelectedFile> = BTreeMap::new();

    for dir in project_dirs {
        for candidate in list_session_logs(dir) {
            let name = candidate
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let replace = by_name
                .get(&name)
                .map_or(true, |existing| candidate.modified > existing.modified);
            if replace {
                by_name.insert(name, candidate);
            }
        }
    }

    let mut files: Vec<SelectedFile> = by_name.into_values().collect();
    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    files.truncate(count);
    files
}

/// Lists `*.jsonl` regular files directly inside `dir`, skipping hidden files.
///
/// Symlinks are resolved, so a linked log counts with its target's mtime.
fn list_session_logs(dir: &Path) -> Vec<SelectedFile> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_session_log(entry.path()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            SelectedFile {
                path: entry.into_path(),
                source_dir: dir.to_path_buf(),
                modified,
            }
        })
        .collect()
}

fn is_session_log(path: &Path) -> bool {
    let visible = path
        .file_name()
        .is_some_and(|name| !name.to_string_lossy().starts_with('.'));
    visible && path.extension().is_some_and(|ext| ext == SESSION_LOG_EXTENSION)
}
