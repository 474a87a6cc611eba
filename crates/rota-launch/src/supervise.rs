//! The tier supervisor: tries launch strategies in order, performs the
//! known-good backup side effects at the strategy-selection boundary, and
//! escalates only when every tier failed to start the worker.

use crate::evidence;
use crate::runner::{RunStatus, WorkerRunner, LAUNCH_SCRIPT};
use crate::tier::{build_plan, Tier};
use anyhow::{bail, Result};
use rota_rotation::SessionType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One tier's attempt, for the report and the crash artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierAttempt {
    pub tier: String,
    pub exit_ok: bool,
    pub evidence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a tick's launch: which tier got the worker running.
#[derive(Debug)]
pub struct LaunchReport {
    pub tier: Tier,
    pub attempts: Vec<TierAttempt>,
}

/// The single contract for "something needs a human": a fixed, greppable
/// schema persisted when all three tiers fail to start the worker.
#[derive(Debug, Serialize, Deserialize)]
pub struct CrashReport {
    pub timestamp: String,
    pub tiers_attempted: Vec<TierAttempt>,
    pub result: String,
    pub suggested_action: String,
}

pub fn crash_report_path(root: &Path) -> PathBuf {
    root.join("crash-report.json")
}

fn backup_path(root: &Path) -> PathBuf {
    root.join("backup").join("launch-worker.known-good")
}

/// Copy the known-good backup over the launch script, if a backup exists.
/// Guards against a prior self-modification having broken the script.
fn restore_known_good(root: &Path) {
    let backup = backup_path(root);
    if backup.exists() {
        if let Err(e) = std::fs::copy(&backup, root.join(LAUNCH_SCRIPT)) {
            eprintln!("warning: could not restore launch script from backup: {e}");
        }
    }
}

/// A session that reached the worker at the FULL tier is evidence the
/// current script is healthy; refresh the backup from it.
fn update_known_good(root: &Path) {
    let script = root.join(LAUNCH_SCRIPT);
    if script.exists() {
        let backup = backup_path(root);
        if let Some(parent) = backup.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::copy(&script, &backup) {
            eprintln!("warning: could not update known-good backup: {e}");
        }
    }
}

/// Launch the worker for this tick, degrading through the tiers.
///
/// "Started" means the launcher exited 0 *or* a new log artifact appeared;
/// a worker that starts and later fails is still a successful launch.
/// `forced_tier` pins a single tier (the `--safe-mode` / `--emergency`
/// flags); otherwise the full fallback order runs.
pub async fn run_tick(
    root: &Path,
    runner: &dyn WorkerRunner,
    slot: SessionType,
    extra_args: &[String],
    forced_tier: Option<Tier>,
) -> Result<LaunchReport> {
    let tiers: Vec<Tier> = match forced_tier {
        Some(t) => vec![t],
        None => Tier::ORDER.to_vec(),
    };
    let logs_dir = root.join("logs");
    let mut attempts = Vec::new();

    for tier in tiers {
        if tier == Tier::Safe {
            restore_known_good(root);
        }

        let baseline = evidence::newest_artifact(&logs_dir);
        let plan = build_plan(tier, slot, extra_args);
        let status = runner.run(&plan, root).await;

        let exit_ok = status.exit_ok();
        let saw_evidence = evidence::worker_started(&logs_dir, baseline);
        let error = match &status {
            RunStatus::SpawnFailed(e) => Some(e.clone()),
            RunStatus::Exited(0) => None,
            RunStatus::Exited(code) => Some(format!("exit {code}")),
        };
        attempts.push(TierAttempt {
            tier: tier.label().to_string(),
            exit_ok,
            evidence: saw_evidence,
            error,
        });

        if exit_ok || saw_evidence {
            if tier == Tier::Full {
                update_known_good(root);
            }
            return Ok(LaunchReport { tier, attempts });
        }
        eprintln!("launch tier {} did not start the worker", tier.label());
    }

    let report = CrashReport {
        timestamp: now_rfc3339(),
        tiers_attempted: attempts,
        result: "worker_never_started".into(),
        suggested_action: "inspect logs/ and launch-worker.sh under the state root; \
                           run `rota launch --emergency` by hand once fixed"
            .into(),
    };
    rota_store::save_json(&crash_report_path(root), &report)?;
    bail!("all launch tiers failed to start the worker; crash report written");
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
