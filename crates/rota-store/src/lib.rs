use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod budget;

pub use budget::Budget;

/// Environment variable overriding the state root.
pub const HOME_ENV: &str = "ROTA_HOME";

/// Resolve the state root directory.
/// `$ROTA_HOME` if set, else the platform config dir (`~/.config/rota`),
/// else `./.rota` as a last resort.
pub fn state_root() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("rota")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".rota")
    } else {
        PathBuf::from(".rota")
    }
}

/// Ensure the state root and its subdirectories exist.
pub fn ensure_dirs(root: &Path) -> anyhow::Result<()> {
    for sub in ["logs", "backup", "archive"] {
        fs::create_dir_all(root.join(sub))?;
    }
    Ok(())
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON and write it atomically.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    write_atomic(path, data.as_bytes())
}

/// Load and parse a JSON file. Returns `None` when the file does not exist.
/// A file that exists but cannot be read or parsed is an error; the caller
/// decides the recovery policy.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
    Ok(Some(value))
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}
