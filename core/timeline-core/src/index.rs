//! Per-directory session index (`sessions-index.json`).
//!
//! The assistant maintains an index alongside each project's logs with
//! authoritative summaries and branches. Index values take precedence over
//! anything parsed from the log itself.

use crate::error::{Result, TimelineError};
use fs_err as fs;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SESSIONS_INDEX_FILE: &str = "sessions-index.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub git_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    entries: Vec<IndexEntry>,
}

/// Merged view of every directory's index, keyed by full session id.
#[derive(Debug, Clone, Default)]
pub struct SessionIndex {
    entries: HashMap<String, IndexEntry>,
}

impl SessionIndex {
    /// Loads and merges the index file of every directory. Missing or
    /// malformed files are skipped; later entries for the same id win.
    pub fn load(project_dirs: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for dir in project_dirs {
            match read_index_file(dir) {
                Ok(entries) => index.extend(entries),
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping session index");
                }
            }
        }
        index
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        for entry in entries {
            if let Some(id) = entry.session_id.clone() {
                self.entries.insert(id, entry);
            }
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&IndexEntry> {
        self.entries.get(session_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_index_file(dir: &Path) -> Result<Vec<IndexEntry>> {
    let path = dir.join(SESSIONS_INDEX_FILE);
    let content = fs::read_to_string(&path).map_err(|source| TimelineError::Io {
        context: "reading session index".to_string(),
        source,
    })?;
    let file: IndexFile = serde_json::from_str(&content).map_err(|source| TimelineError::Json {
        context: format!("parsing {}", path.display()),
        source,
    })?;
    Ok(file.entries)
}

/// Picks the first non-empty candidate, in precedence order.
pub fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_index(dir: &Path, content: &str) {
        fs::write(dir.join(SESSIONS_INDEX_FILE), content).unwrap();
    }

    #[test]
    fn test_load_reads_entries() {
        let temp = TempDir::new().unwrap();
        write_index(
            temp.path(),
            r#"{"entries":[{"sessionId":"abc","summary":"Fix login","gitBranch":"main","messageCount":4}]}"#,
        );

        let index = SessionIndex::load(&[temp.path().to_path_buf()]);
        let entry = index.get("abc").unwrap();
        assert_eq!(entry.summary.as_deref(), Some("Fix login"));
        assert_eq!(entry.git_branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_entries_without_session_id_are_ignored() {
        let temp = TempDir::new().unwrap();
        write_index(
            temp.path(),
            r#"{"entries":[{"summary":"orphan"},{"sessionId":"x","summary":null}]}"#,
        );

        let index = SessionIndex::load(&[temp.path().to_path_buf()]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("x").unwrap().summary, None);
    }

    #[test]
    fn test_later_directory_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_index(first.path(), r#"{"entries":[{"sessionId":"s","summary":"old"}]}"#);
        write_index(second.path(), r#"{"entries":[{"sessionId":"s","summary":"new"}]}"#);

        let index = SessionIndex::load(&[first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(index.get("s").unwrap().summary.as_deref(), Some("new"));
    }

    #[test]
    fn test_malformed_and_missing_files_are_skipped() {
        let broken = TempDir::new().unwrap();
        let good = TempDir::new().unwrap();
        write_index(broken.path(), "{ not json");
        write_index(good.path(), r#"{"entries":[{"sessionId":"ok"}]}"#);

        let dirs = vec![
            PathBuf::from("/definitely/not/a/real/dir/xyz123"),
            broken.path().to_path_buf(),
            good.path().to_path_buf(),
        ];
        let index = SessionIndex::load(&dirs);
        assert_eq!(index.len(), 1);
        assert!(index.get("ok").is_some());
    }

    #[test]
    fn test_missing_entries_key_is_empty() {
        let temp = TempDir::new().unwrap();
        write_index(temp.path(), r#"{"version":1}"#);
        assert!(SessionIndex::load(&[temp.path().to_path_buf()]).is_empty());
    }

    #[test]
    fn test_first_present_skips_empty_and_absent() {
        assert_eq!(first_present(&[None, Some(""), Some("b"), Some("c")]), Some("b"));
        assert_eq!(first_present(&[None, Some("")]), None);
    }
}
