use crate::tier::{LaunchPlan, Tier};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a launch attempt ended, from the launcher's own point of view.
/// Whether the worker *started* is judged separately from log evidence.
#[derive(Debug, Clone)]
pub enum RunStatus {
    Exited(i32),
    SpawnFailed(String),
}

impl RunStatus {
    pub fn exit_ok(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

/// Trait for starting worker processes. Implemented by ProcessRunner (real)
/// and MockRunner (tests).
#[async_trait::async_trait]
pub trait WorkerRunner: Send + Sync {
    async fn run(&self, plan: &LaunchPlan, root: &Path) -> RunStatus;
}

/// Runs the launch script under the state root with a bounded timeout.
pub struct ProcessRunner {
    pub script: PathBuf,
    pub timeout_secs: u64,
}

/// Filename of the launch script under the state root.
pub const LAUNCH_SCRIPT: &str = "launch-worker.sh";

impl ProcessRunner {
    pub fn new(root: &Path) -> Self {
        Self {
            script: root.join(LAUNCH_SCRIPT),
            timeout_secs: 3600,
        }
    }
}

#[async_trait::async_trait]
impl WorkerRunner for ProcessRunner {
    async fn run(&self, plan: &LaunchPlan, root: &Path) -> RunStatus {
        let mut cmd = tokio::process::Command::new(&self.script);
        cmd.args(&plan.args)
            .arg("--prompt")
            .arg(&plan.prompt)
            .current_dir(root)
            .stdin(std::process::Stdio::null())
            .env("ROTA_TIER", plan.tier.label())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return RunStatus::SpawnFailed(e.to_string()),
        };

        match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => RunStatus::Exited(output.status.code().unwrap_or(-1)),
            Ok(Err(e)) => RunStatus::SpawnFailed(e.to_string()),
            // The launcher gave up waiting; log evidence may still show the
            // worker got going, which is all this layer promises.
            Err(_) => RunStatus::Exited(-1),
        }
    }
}

/// Mock runner for tests. Pops scripted results per tier; each result can
/// also drop a log artifact to simulate a worker that reached startup.
pub struct MockRunner {
    results: std::sync::Mutex<HashMap<Tier, Vec<(RunStatus, bool)>>>,
    counter: std::sync::atomic::AtomicU32,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            results: std::sync::Mutex::new(HashMap::new()),
            counter: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Queue a result for a tier. `creates_artifact` simulates the worker
    /// writing its first log line.
    pub fn script(&self, tier: Tier, status: RunStatus, creates_artifact: bool) {
        self.results
            .lock()
            .unwrap()
            .entry(tier)
            .or_default()
            .push((status, creates_artifact));
    }
}

#[async_trait::async_trait]
impl WorkerRunner for MockRunner {
    async fn run(&self, plan: &LaunchPlan, root: &Path) -> RunStatus {
        let (status, artifact) = {
            let mut map = self.results.lock().unwrap();
            match map.get_mut(&plan.tier) {
                Some(vec) if !vec.is_empty() => vec.remove(0),
                _ => (RunStatus::Exited(0), true),
            }
        };
        if artifact {
            let n = self
                .counter
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let logs = root.join("logs");
            let _ = std::fs::create_dir_all(&logs);
            let _ = std::fs::write(logs.join(format!("mock-{n}.log")), plan.tier.label());
        }
        status
    }
}
