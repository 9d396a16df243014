//! Repository name resolution for project directories.
//!
//! Session logs live in directories named after the encoded project path
//! (`/Users/me/src/app` becomes `-Users-me-src-app`). A listing of known
//! repositories maps those encoded names back to short repository names;
//! when no listing is available the name is derived from the directory itself.

use crate::error::{Result, TimelineError};
use crate::patterns::RE_WORKTREE_SUFFIX;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Source of known repository paths.
///
/// Implementors should:
/// - Return absolute paths, one per repository
/// - Return an error rather than panic when the source is unavailable
pub trait RepoLister {
    /// Identifier used in diagnostics (e.g., "ghq")
    fn id(&self) -> &'static str;

    /// List absolute paths of known repositories.
    fn list_repos(&self) -> Result<Vec<String>>;
}

/// Lister that knows no repositories. Names fall back to path heuristics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRepoLister;

impl RepoLister for NoRepoLister {
    fn id(&self) -> &'static str {
        "none"
    }

    fn list_repos(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Default time allowed for the listing command.
pub const GHQ_TIMEOUT: Duration = Duration::from_secs(5);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Lists repositories via `ghq list -p`.
#[derive(Debug, Clone)]
pub struct GhqRepoLister {
    program: String,
    timeout: Duration,
}

impl Default for GhqRepoLister {
    fn default() -> Self {
        Self {
            program: "ghq".to_string(),
            timeout: GHQ_TIMEOUT,
        }
    }
}

impl GhqRepoLister {
    /// Uses a different executable; for tests and non-standard installs.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl RepoLister for GhqRepoLister {
    fn id(&self) -> &'static str {
        "ghq"
    }

    fn list_repos(&self) -> Result<Vec<String>> {
        let stdout = run_with_timeout(&self.program, &["list", "-p"], self.timeout)?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Runs a command and returns its stdout, killing it if it outlives `timeout`.
///
/// Stdout is drained on a helper thread so a large listing cannot fill the
/// pipe and stall the child.
fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| TimelineError::CommandFailed {
            command: command.clone(),
            details: e.to_string(),
        })?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| TimelineError::CommandFailed {
            command: command.clone(),
            details: "stdout not captured".to_string(),
        })?;

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut output = String::new();
        let result = stdout.read_to_string(&mut output).map(|_| output);
        let _ = tx.send(result);
    });

    let deadline = Instant::now() + timeout;
    let output = match rx.recv_timeout(timeout) {
        Ok(result) => result.map_err(|e| TimelineError::CommandFailed {
            command: command.clone(),
            details: e.to_string(),
        })?,
        Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TimelineError::CommandTimedOut { command, timeout });
        }
    };

    // Stdout closing does not mean the child has exited.
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TimelineError::CommandTimedOut { command, timeout });
                }
                std::thread::sleep(EXIT_POLL_INTERVAL);
            }
            Err(e) => {
                return Err(TimelineError::CommandFailed {
                    command,
                    details: e.to_string(),
                })
            }
        }
    };
    if !status.success() {
        return Err(TimelineError::CommandFailed {
            command,
            details: format!("exited with {}", status),
        });
    }

    Ok(output)
}

/// Read-only lookup from encoded directory name to short repository name.
#[derive(Debug, Clone, Default)]
pub struct RepoMap {
    names: HashMap<String, String>,
}

impl RepoMap {
    /// Builds the map from a lister. Any listing failure yields an empty map.
    pub fn build(lister: &dyn RepoLister) -> Self {
        match lister.list_repos() {
            Ok(paths) => {
                let map = Self::from_paths(&paths);
                tracing::debug!(lister = lister.id(), repos = map.len(), "Repository map built");
                map
            }
            Err(e) => {
                tracing::debug!(
                    lister = lister.id(),
                    error = %e,
                    "Repository listing unavailable; using directory names"
                );
                Self::default()
            }
        }
    }

    /// Keys each path by its slash-to-hyphen encoding, valued by its last segment.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let names = paths
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|path| !path.is_empty())
            .map(|path| {
                let name = path.split('/').next_back().unwrap_or(path);
                (encode_project_path(path), name.to_string())
            })
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves a project directory to a short repository name.
    ///
    /// Strips a trailing `-wt-<digits>` worktree suffix, then tries the map,
    /// then the last hyphen-delimited token, then the cleaned name itself.
    pub fn resolve(&self, project_dir: &Path) -> String {
        let base = dir_base_name(project_dir);
        let clean = RE_WORKTREE_SUFFIX.replace(&base, "");

        if let Some(name) = self.names.get(&*clean).filter(|n| !n.is_empty()) {
            return name.clone();
        }

        let token = clean.rsplit('-').next().unwrap_or("");
        if !token.is_empty() {
            return token.to_string();
        }
        clean.into_owned()
    }
}

/// Encodes a path the way session log directories are named.
pub fn encode_project_path(path: &str) -> String {
    path.replace('/', "-")
}

/// Last path component, ignoring trailing slashes.
fn dir_base_name(path: &Path) -> String {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}
