use crate::state::{Outcome, RotationState};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Unified rotation document under the state root.
pub fn state_path(root: &Path) -> PathBuf {
    root.join("rotation-state.json")
}

/// Load the rotation state, rebuilding it when missing or corrupt.
///
/// Recovery order: legacy single-purpose flat files if any are present,
/// else hardcoded defaults. A rebuild is persisted immediately (with
/// `migrated_from_legacy` set when legacy data contributed) so it runs
/// at most once.
pub fn load_or_init(root: &Path) -> Result<RotationState> {
    let path = state_path(root);
    match rota_store::load_json::<RotationState>(&path) {
        Ok(Some(state)) => Ok(state),
        Ok(None) => rebuild(root),
        Err(e) => {
            eprintln!("warning: {e}; rebuilding rotation state");
            rebuild(root)
        }
    }
}

/// Stamp `last_updated` and write the document atomically.
pub fn save(root: &Path, state: &mut RotationState) -> Result<()> {
    state.last_updated = Some(now_rfc3339());
    rota_store::save_json(&state_path(root), state)
}

fn rebuild(root: &Path) -> Result<RotationState> {
    let mut state = migrate_legacy(root).unwrap_or_default();
    save(root, &mut state)?;
    Ok(state)
}

/// One-time migration from the legacy flat-file layout, where each field
/// lived in its own text file. Returns `None` when no legacy file exists.
fn migrate_legacy(root: &Path) -> Option<RotationState> {
    let counter = read_legacy_u64(&root.join("session-counter.txt"));
    let index = read_legacy_u64(&root.join("rotation-index.txt"));
    let retry = read_legacy_u64(&root.join("retry-count.txt"));
    let outcome = std::fs::read_to_string(root.join("last-outcome.txt"))
        .ok()
        .and_then(|s| s.trim().parse::<Outcome>().ok());

    if counter.is_none() && index.is_none() && retry.is_none() && outcome.is_none() {
        return None;
    }

    Some(RotationState {
        session_counter: counter.unwrap_or(0),
        rotation_index: index.unwrap_or(0),
        retry_count: retry.unwrap_or(0) as u32,
        last_outcome: outcome.unwrap_or(Outcome::Success),
        migrated_from_legacy: true,
        last_updated: None,
    })
}

fn read_legacy_u64(path: &Path) -> Option<u64> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
