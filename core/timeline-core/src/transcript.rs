//! Session transcript parsing.
//!
//! Each line of a session log is a self-contained JSON record. Lines are
//! classified one at a time into a `LineOutcome` and folded into a
//! `ParsedSession`; a malformed line is a skip, never a failure.

use fs_err as fs;
use serde_json::Value;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Maximum characters kept from a human message or summary.
pub const MAX_TEXT_CHARS: usize = 80;

/// Human messages must be longer than this (after trimming) to count.
const MIN_HUMAN_TEXT_CHARS: usize = 5;

/// Synthetic message inserted when the user interrupts the assistant.
const INTERRUPTED_PREFIX: &str = "[Request interrupted";

/// Metadata accumulated from one session log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSession {
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub summary: Option<String>,
    pub git_branch: Option<String>,
    pub is_sidechain: bool,
    /// Human-authored messages, trimmed and truncated, in log order.
    pub human_messages: Vec<String>,
    pub assistant_messages: usize,
    pub skipped_lines: usize,
}

impl ParsedSession {
    pub fn first_prompt(&self) -> Option<&str> {
        self.human_messages.first().map(String::as_str)
    }

    /// Folds one line outcome into the accumulator.
    pub fn absorb(&mut self, outcome: LineOutcome) {
        let record = match outcome {
            LineOutcome::Record(record) => record,
            LineOutcome::Skip => {
                self.skipped_lines += 1;
                return;
            }
        };

        if let Some(ts) = record.timestamp {
            if self.first_timestamp.as_deref().map_or(true, |first| ts.as_str() < first) {
                self.first_timestamp = Some(ts.clone());
            }
            if self.last_timestamp.as_deref().map_or(true, |last| ts.as_str() > last) {
                self.last_timestamp = Some(ts);
            }
        }

        match record.kind {
            RecordKind::Summary {
                summary,
                git_branch,
                is_sidechain,
            } => {
                if summary.is_some() {
                    self.summary = summary;
                }
                if git_branch.is_some() {
                    self.git_branch = git_branch;
                }
                if let Some(flag) = is_sidechain {
                    self.is_sidechain = flag;
                }
            }
            RecordKind::Assistant => self.assistant_messages += 1,
            RecordKind::User(Some(text)) => self.human_messages.push(text),
            RecordKind::User(None) | RecordKind::Other => {}
        }
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Record(LogRecord),
    Skip,
}

/// The parts of a log record the timeline cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: Option<String>,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    Summary {
        summary: Option<String>,
        git_branch: Option<String>,
        is_sidechain: Option<bool>,
    },
    Assistant,
    /// A user record, carrying its human text if it passed the filters.
    User(Option<String>),
    Other,
}

/// Classifies a single log line.
pub fn parse_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Skip;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return LineOutcome::Skip,
    };
    if !value.is_object() {
        return LineOutcome::Skip;
    }

    let timestamp = non_empty_str(&value, "timestamp");
    let kind = match value.get("type").and_then(Value::as_str) {
        Some("summary") => RecordKind::Summary {
            summary: non_empty_str(&value, "summary"),
            git_branch: non_empty_str(&value, "gitBranch"),
            is_sidechain: value.get("isSidechain").and_then(Value::as_bool),
        },
        Some("assistant") => RecordKind::Assistant,
        Some("user") => RecordKind::User(
            extract_user_text(&value)
                .as_deref()
                .and_then(human_text),
        ),
        _ => RecordKind::Other,
    };

    LineOutcome::Record(LogRecord { timestamp, kind })
}

/// Parses a whole session log. Returns `None` when the file cannot be
/// opened or holds no timestamp.
pub fn parse_session_file(path: &Path) -> Option<ParsedSession> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping unreadable session log");
            return None;
        }
    };

    let mut session = ParsedSession::default();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => session.absorb(parse_line(&line)),
            // Invalid UTF-8; the reader has already moved past the line.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                session.absorb(LineOutcome::Skip)
            }
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Stopped reading session log"
                );
                break;
            }
        }
    }

    if session.skipped_lines > 0 {
        tracing::debug!(
            path = %path.display(),
            skipped = session.skipped_lines,
            "Skipped malformed lines"
        );
    }

    if session.first_timestamp.is_none() {
        tracing::debug!(path = %path.display(), "Session log has no timestamps");
        return None;
    }
    Some(session)
}

/// Pulls the message text out of a user record.
///
/// List content yields the first `text` element; string content is used as-is.
fn extract_user_text(value: &Value) -> Option<String> {
    let content = value.get("message")?.get("content")?;
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items
            .iter()
            .find(|item| item.get("type").and_then(Value::as_str) == Some("text"))
            .map(|item| {
                item.get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            }),
        _ => None,
    }
}

/// Applies the human-message filters, returning the trimmed, truncated text.
pub fn human_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.chars().count() <= MIN_HUMAN_TEXT_CHARS || text.starts_with(INTERRUPTED_PREFIX) {
        return None;
    }
    Some(truncate_chars(text, MAX_TEXT_CHARS))
}

/// Truncates to at most `max` characters, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn user_line(text: &str) -> String {
        serde_json::json!({
            "type": "user",
            "timestamp": "2024-01-01T00:00:00Z",
            "message": {"role": "user", "content": [{"type": "text", "text": text}]}
        })
        .to_string()
    }

    fn fold(lines: &[String]) -> ParsedSession {
        let mut session = ParsedSession::default();
        for line in lines {
            session.absorb(parse_line(line));
        }
        session
    }

    fn write_log(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Human Message Filtering
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_short_message_excluded() {
        assert_eq!(human_text("ok"), None);
        assert_eq!(human_text("  hello  "), None);
    }

    #[test]
    fn test_interrupted_message_excluded() {
        assert_eq!(human_text("[Request interrupted by user]"), None);
        assert_eq!(human_text("  [Request interrupted by user for tool use]"), None);
    }

    #[test]
    fn test_real_message_included_and_truncated() {
        assert_eq!(
            human_text("please fix the bug"),
            Some("please fix the bug".to_string())
        );

        let long = "x".repeat(200);
        let kept = human_text(&long).unwrap();
        assert_eq!(kept.chars().count(), 80);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        let text = "é".repeat(100);
        let truncated = truncate_chars(&text, 80);
        assert_eq!(truncated.chars().count(), 80);
        assert_eq!(truncate_chars("short", 80), "short");
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Line Classification
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_malformed_lines_are_skipped() {
        assert_eq!(parse_line("not json"), LineOutcome::Skip);
        assert_eq!(parse_line(""), LineOutcome::Skip);
        assert_eq!(parse_line("[1, 2, 3]"), LineOutcome::Skip);
    }

    #[test]
    fn test_user_string_content() {
        let line = r#"{"type":"user","message":{"content":"  refactor the parser  "}}"#;
        match parse_line(line) {
            LineOutcome::Record(record) => {
                assert_eq!(
                    record.kind,
                    RecordKind::User(Some("refactor the parser".to_string()))
                );
                assert_eq!(record.timestamp, None);
            }
            LineOutcome::Skip => panic!("expected a record"),
        }
    }

    #[test]
    fn test_user_list_content_uses_first_text_element() {
        let line = serde_json::json!({
            "type": "user",
            "message": {"content": [
                {"type": "tool_result", "content": "ignored output"},
                {"type": "text", "text": "ok"},
                {"type": "text", "text": "a much longer second message"}
            ]}
        })
        .to_string();

        // First text element is "ok", which is filtered; later elements are not consulted.
        match parse_line(&line) {
            LineOutcome::Record(record) => assert_eq!(record.kind, RecordKind::User(None)),
            LineOutcome::Skip => panic!("expected a record"),
        }
    }

    #[test]
    fn test_user_tool_result_only_has_no_text() {
        let line = r#"{"type":"user","message":{"content":[{"type":"tool_result","content":"x"}]}}"#;
        match parse_line(line) {
            LineOutcome::Record(record) => assert_eq!(record.kind, RecordKind::User(None)),
            LineOutcome::Skip => panic!("expected a record"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Folding
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_timestamp_bounds_are_lexical_min_and_max() {
        let lines = vec![
            r#"{"type":"assistant","timestamp":"2024-01-01T00:05:00Z"}"#.to_string(),
            r#"{"type":"assistant","timestamp":"2024-01-01T00:01:00Z"}"#.to_string(),
            r#"{"type":"assistant","timestamp":"2024-01-01T00:09:00Z"}"#.to_string(),
        ];
        let session = fold(&lines);
        assert_eq!(session.first_timestamp.as_deref(), Some("2024-01-01T00:01:00Z"));
        assert_eq!(session.last_timestamp.as_deref(), Some("2024-01-01T00:09:00Z"));
        assert_eq!(session.assistant_messages, 3);
    }

    #[test]
    fn test_later_summary_wins_but_absent_fields_do_not_erase() {
        let lines = vec![
            r#"{"type":"summary","summary":"First","gitBranch":"feature/x","isSidechain":true}"#
                .to_string(),
            r#"{"type":"summary","summary":"Second"}"#.to_string(),
        ];
        let session = fold(&lines);
        assert_eq!(session.summary.as_deref(), Some("Second"));
        assert_eq!(session.git_branch.as_deref(), Some("feature/x"));
        assert!(session.is_sidechain);
    }

    #[test]
    fn test_fold_counts_messages_and_skips() {
        let lines = vec![
            user_line("please fix the bug"),
            user_line("ok"),
            user_line("[Request interrupted by user]"),
            "{broken".to_string(),
            r#"{"type":"assistant","timestamp":"2024-01-01T00:10:00Z"}"#.to_string(),
        ];
        let session = fold(&lines);
        assert_eq!(session.human_messages, vec!["please fix the bug".to_string()]);
        assert_eq!(session.first_prompt(), Some("please fix the bug"));
        assert_eq!(session.assistant_messages, 1);
        assert_eq!(session.skipped_lines, 1);
    }

    #[test]
    fn test_parse_session_file_reads_log() {
        let file = write_log(&[
            r#"{"type":"user","timestamp":"2024-01-01T00:00:00Z","message":{"content":"please fix the bug"}}"#,
            "garbage line",
            r#"{"type":"assistant","timestamp":"2024-01-01T00:10:00Z"}"#,
        ]);
        let session = parse_session_file(file.path()).unwrap();
        assert_eq!(session.first_timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(session.last_timestamp.as_deref(), Some("2024-01-01T00:10:00Z"));
        assert_eq!(session.human_messages.len(), 1);
        assert_eq!(session.assistant_messages, 1);
    }

    #[test]
    fn test_parse_session_file_without_timestamps_is_none() {
        let file = write_log(&[r#"{"type":"summary","summary":"No times here"}"#]);
        assert!(parse_session_file(file.path()).is_none());
    }

    #[test]
    fn test_parse_session_file_skips_invalid_utf8_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type":"assistant","timestamp":"2024-01-01T00:00:00Z"}}"#).unwrap();
        file.write_all(b"{\"type\":\"user\",\"x\":\"\xff\xfe\"}\n").unwrap();
        writeln!(file, r#"{{"type":"assistant","timestamp":"2024-01-01T00:20:00Z"}}"#).unwrap();

        let session = parse_session_file(file.path()).unwrap();
        assert_eq!(session.assistant_messages, 2);
        assert_eq!(session.skipped_lines, 1);
        assert_eq!(session.last_timestamp.as_deref(), Some("2024-01-01T00:20:00Z"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_session_file_stops_on_read_error() {
        // Opening a directory succeeds on unix, but every read fails.
        let dir = tempfile::TempDir::new().unwrap();
        assert!(parse_session_file(dir.path()).is_none());
    }

    #[test]
    fn test_parse_session_file_missing_is_none() {
        assert!(parse_session_file(Path::new("/definitely/not/a/real/file.jsonl")).is_none());
    }
}
