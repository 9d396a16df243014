//! Timeline assembly: chronological ordering with idle-gap markers.

use crate::timestamps::parse_display;
use crate::types::{
    GapMarker, SessionRecord, TimelineEntry, NO_SESSION_YET_LABEL, SLEEPING_LABEL,
};

/// Sorts sessions by display start time and interleaves gap markers.
///
/// The output always opens with a "sleeping / offline" marker and closes with
/// a "no session yet" marker. Between two sessions a gap marker is inserted
/// only when the idle time exceeds `gap_threshold_minutes`; pairs whose
/// timestamps don't parse get no marker.
pub fn assemble_timeline(
    mut sessions: Vec<SessionRecord>,
    gap_threshold_minutes: i64,
) -> Vec<TimelineEntry> {
    // Display strings are fixed-width and zero-padded, so lexical order is chronological.
    sessions.sort_by(|a, b| a.start_gmt7.cmp(&b.start_gmt7));

    let mut entries = Vec::with_capacity(sessions.len() * 2 + 2);
    entries.push(TimelineEntry::Gap(GapMarker::boundary(SLEEPING_LABEL)));

    let mut previous_end: Option<String> = None;
    for session in sessions {
        if let Some(prev_end) = previous_end.as_deref() {
            if let Some(minutes) = idle_minutes(prev_end, &session.start_gmt7) {
                if minutes > gap_threshold_minutes {
                    entries.push(TimelineEntry::Gap(GapMarker::idle(minutes)));
                }
            }
        }
        previous_end = Some(session.end_gmt7.clone());
        entries.push(TimelineEntry::Session(session));
    }

    entries.push(TimelineEntry::Gap(GapMarker::boundary(NO_SESSION_YET_LABEL)));
    entries
}

/// Whole minutes from one display timestamp to the next, if both parse.
fn idle_minutes(previous_end: &str, current_start: &str) -> Option<i64> {
    let end = parse_display(previous_end)?;
    let start = parse_display(current_start)?;
    Some(start.signed_duration_since(end).num_minutes())
}
