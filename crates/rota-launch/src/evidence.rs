//! Launch evidence: did the worker actually start? A fresh artifact in the
//! log directory counts, even when the launcher itself exited badly.
//!
//! The timing here is inherently approximate: a worker that delays its
//! first log write can be misread as not started. That slack is accepted
//! rather than papered over with retries.

use std::path::Path;
use std::time::SystemTime;

/// Modification time of the newest entry in the log directory, if any.
pub fn newest_artifact(logs_dir: &Path) -> Option<SystemTime> {
    let entries = std::fs::read_dir(logs_dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter_map(|m| m.modified().ok())
        .max()
}

/// True when an artifact newer than the pre-launch baseline exists.
/// With no baseline (empty log dir before launch), any artifact counts.
pub fn worker_started(logs_dir: &Path, baseline: Option<SystemTime>) -> bool {
    match (newest_artifact(logs_dir), baseline) {
        (Some(newest), Some(before)) => newest > before,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
