//! Pipeline entry point.
//!
//! `TimelineEngine` wires the stages together for one run: select files,
//! parse each, merge index metadata, then assemble the timeline. The repo map
//! is built once at construction and only read afterwards.

use crate::config::TimelineConfig;
use crate::error::{Result, TimelineError};
use crate::files::{select_recent_files, SelectedFile};
use crate::index::{first_present, SessionIndex};
use crate::repos::{RepoLister, RepoMap};
use crate::timeline::assemble_timeline;
use crate::timestamps::{duration_minutes, to_display};
use crate::transcript::{parse_session_file, truncate_chars, ParsedSession, MAX_TEXT_CHARS};
use crate::types::{SessionRecord, TimelineEntry};

/// Characters of the session id shown in the report.
pub const SESSION_ID_DISPLAY_CHARS: usize = 12;

pub const NO_SUMMARY: &str = "No summary";
pub const UNKNOWN_BRANCH: &str = "unknown";

pub struct TimelineEngine {
    config: TimelineConfig,
    repo_map: RepoMap,
}

impl TimelineEngine {
    /// Creates an engine, building the repo map from `lister`.
    pub fn new(config: TimelineConfig, lister: &dyn RepoLister) -> Self {
        let repo_map = RepoMap::build(lister);
        Self { config, repo_map }
    }

    /// Parses the most recent session logs into records, in selection order.
    pub fn collect_sessions(&self) -> Vec<SessionRecord> {
        let files = select_recent_files(&self.config.project_dirs, self.config.count);
        let index = SessionIndex::load(&self.config.project_dirs);
        tracing::debug!(
            files = files.len(),
            index_entries = index.len(),
            "Selected session logs"
        );

        files
            .iter()
            .filter_map(|file| {
                let parsed = parse_session_file(&file.path)?;
                Some(self.build_record(file, &parsed, &index))
            })
            .collect()
    }

    /// Runs the full pipeline and returns the annotated timeline.
    pub fn build_timeline(&self) -> Vec<TimelineEntry> {
        let sessions = self.collect_sessions();
        tracing::info!(sessions = sessions.len(), "Timeline assembled");
        assemble_timeline(sessions, self.config.gap_threshold_minutes)
    }

    fn build_record(
        &self,
        file: &SelectedFile,
        parsed: &ParsedSession,
        index: &SessionIndex,
    ) -> SessionRecord {
        merge_session(
            &file.session_id(),
            self.repo_map.resolve(&file.source_dir),
            parsed,
            index,
            self.config.display_offset_hours,
        )
    }
}

/// Combines parsed log data with index metadata into a timeline record.
///
/// Summary precedence: index, summary record, first human message,
/// `"No summary"`. Branch precedence: index, summary record, `"unknown"`.
pub fn merge_session(
    session_id: &str,
    repo_name: String,
    parsed: &ParsedSession,
    index: &SessionIndex,
    display_offset_hours: i64,
) -> SessionRecord {
    let entry = index.get(session_id);
    let first = parsed.first_timestamp.as_deref().unwrap_or_default();
    let last = parsed.last_timestamp.as_deref().unwrap_or(first);

    let summary = first_present(&[
        entry.and_then(|e| e.summary.as_deref()),
        parsed.summary.as_deref(),
        parsed.first_prompt(),
    ])
    .unwrap_or(NO_SUMMARY);
    let git_branch = first_present(&[
        entry.and_then(|e| e.git_branch.as_deref()),
        parsed.git_branch.as_deref(),
    ])
    .unwrap_or(UNKNOWN_BRANCH);

    SessionRecord {
        session_id: truncate_chars(session_id, SESSION_ID_DISPLAY_CHARS),
        repo_name,
        start_gmt7: to_display(first, display_offset_hours),
        end_gmt7: to_display(last, display_offset_hours),
        duration_min: duration_minutes(first, last),
        real_human_messages: parsed.human_messages.len(),
        assistant_messages: parsed.assistant_messages,
        first_prompt: parsed.first_prompt().map(str::to_string),
        git_branch: git_branch.to_string(),
        summary: truncate_chars(summary, MAX_TEXT_CHARS),
        is_sidechain: parsed.is_sidechain,
    }
}

/// Serializes the timeline as 2-space indented JSON.
pub fn render_json(entries: &[TimelineEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).map_err(|source| TimelineError::Json {
        context: "serializing timeline".to_string(),
        source,
    })
}
