//! Blocker-check execution: advisory polling of an external command whose
//! success means a blocked item's blocking condition has cleared.

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Shell program and args for the current platform.
#[cfg(windows)]
fn shell_cmd(cmd: &str) -> (String, Vec<String>) {
    ("cmd.exe".into(), vec!["/C".into(), cmd.into()])
}

#[cfg(not(windows))]
fn shell_cmd(cmd: &str) -> (String, Vec<String>) {
    ("sh".into(), vec!["-c".into(), cmd.into()])
}

/// Run a blocker check with a bounded timeout and non-interactive I/O.
/// Returns true only on a clean zero exit; spawn failure, non-zero exit,
/// and timeout all mean "still blocked".
pub async fn blocker_cleared(cmd: &str, timeout_secs: u64, cwd: &Path) -> bool {
    let (shell, args) = shell_cmd(cmd);

    let result = Command::new(&shell)
        .args(&args)
        .current_dir(cwd)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .kill_on_drop(true)
        .status();

    match tokio::time::timeout(Duration::from_secs(timeout_secs), result).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(_)) | Err(_) => false,
    }
}
