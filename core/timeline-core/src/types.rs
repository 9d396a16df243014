//! Output types for the rendered timeline.
//!
//! Field names and ordering are part of the JSON output consumed by
//! downstream displays; keep them stable.

use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════════
// Session Records
// ═══════════════════════════════════════════════════════════════════════════════

/// One session as it appears in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub repo_name: String,
    #[serde(rename = "startGMT7")]
    pub start_gmt7: String,
    #[serde(rename = "endGMT7")]
    pub end_gmt7: String,
    pub duration_min: i64,
    pub real_human_messages: usize,
    pub assistant_messages: usize,
    pub first_prompt: Option<String>,
    pub git_branch: String,
    pub summary: String,
    pub is_sidechain: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Gap Markers
// ═══════════════════════════════════════════════════════════════════════════════

pub const SLEEPING_LABEL: &str = "sleeping / offline";
pub const NO_SESSION_YET_LABEL: &str = "no session yet";

/// Synthetic timeline entry for idle time. Serializes with `"type": "gap"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "gap", rename_all = "camelCase")]
pub struct GapMarker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_min: Option<i64>,
    pub label: String,
}

impl GapMarker {
    /// Boundary marker carrying only a label.
    pub fn boundary(label: &str) -> Self {
        Self {
            gap_min: None,
            label: label.to_string(),
        }
    }

    /// Computed idle gap between two sessions.
    pub fn idle(minutes: i64) -> Self {
        Self {
            gap_min: Some(minutes),
            label: format!("{}m gap", minutes),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Timeline Entries
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimelineEntry {
    Gap(GapMarker),
    Session(SessionRecord),
}

impl TimelineEntry {
    pub fn as_session(&self) -> Option<&SessionRecord> {
        match self {
            TimelineEntry::Session(session) => Some(session),
            TimelineEntry::Gap(_) => None,
        }
    }

    pub fn as_gap(&self) -> Option<&GapMarker> {
        match self {
            TimelineEntry::Gap(gap) => Some(gap),
            TimelineEntry::Session(_) => None,
        }
    }
}
