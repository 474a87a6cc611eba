pub mod evidence;
pub mod runner;
pub mod supervise;
pub mod tier;

pub use runner::{MockRunner, ProcessRunner, RunStatus, WorkerRunner};
pub use supervise::{run_tick, CrashReport, LaunchReport, TierAttempt};
pub use tier::{build_plan, LaunchPlan, Tier};
