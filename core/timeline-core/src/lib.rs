//! # timeline-core
//!
//! Scans coding-assistant session logs and renders a chronological timeline
//! of sessions annotated with idle gaps.
//!
//! ## Design Principles
//!
//! - **Synchronous**: One run, sequential file reads, no async runtime.
//! - **Graceful degradation**: Missing files, malformed lines, and an
//!   unavailable repository listing produce empty/default values, not errors.
//! - **Explicit configuration**: Everything a run needs lives in
//!   [`TimelineConfig`]; external collaborators are injected via [`RepoLister`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use timeline_core::{render_json, GhqRepoLister, TimelineConfig, TimelineEngine};
//!
//! let engine = TimelineEngine::new(TimelineConfig::from_env(), &GhqRepoLister::default());
//! println!("{}", render_json(&engine.build_timeline())?);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod files;
pub mod index;
pub mod patterns;
pub mod repos;
pub mod timeline;
pub mod timestamps;
pub mod transcript;
pub mod types;

pub use config::TimelineConfig;
pub use engine::{merge_session, render_json, TimelineEngine};
pub use error::{Result, TimelineError};
pub use files::{select_recent_files, SelectedFile};
pub use index::{IndexEntry, SessionIndex};
pub use repos::{GhqRepoLister, NoRepoLister, RepoLister, RepoMap};
pub use timeline::assemble_timeline;
pub use transcript::{parse_session_file, LineOutcome, ParsedSession};
pub use types::{GapMarker, SessionRecord, TimelineEntry};
