use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Consecutive non-success outcomes tolerated for one rotation slot before
/// the machine force-advances past it.
pub const MAX_RETRIES: u32 = 3;

/// Result of the previous tick's worker run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Timeout,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Timeout => "timeout",
            Outcome::Error => "error",
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "success" => Ok(Outcome::Success),
            "timeout" => Ok(Outcome::Timeout),
            "error" => Ok(Outcome::Error),
            other => bail!("unknown outcome: \"{other}\" (expected success|timeout|error)"),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `advance()` decided for the upcoming tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Previous tick succeeded; moved to the next rotation slot.
    Advanced,
    /// Previous tick failed; staying on the same slot for attempt `retry`.
    Retried { retry: u32 },
    /// Retry cap hit; moved past a persistently failing slot.
    Forced,
}

/// The persisted rotation document. One per state root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotationState {
    pub session_counter: u64,
    pub rotation_index: u64,
    pub retry_count: u32,
    pub last_outcome: Outcome,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub migrated_from_legacy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            session_counter: 0,
            rotation_index: 0,
            retry_count: 0,
            last_outcome: Outcome::Success,
            migrated_from_legacy: false,
            last_updated: None,
        }
    }
}

impl RotationState {
    /// Decide the rotation slot for the upcoming tick.
    ///
    /// Runs at the *start* of a tick and reads `last_outcome` as recorded by
    /// the *previous* tick's `set_outcome` — the field is deliberately stale
    /// here, because this tick's result is not known yet.
    pub fn advance(&mut self) -> Advance {
        self.session_counter += 1;
        if self.last_outcome == Outcome::Success {
            self.rotation_index += 1;
            self.retry_count = 0;
            Advance::Advanced
        } else if self.retry_count >= MAX_RETRIES {
            // Availability over strict rotation: a permanently failing slot
            // must not stall the whole loop.
            self.rotation_index += 1;
            self.retry_count = 0;
            Advance::Forced
        } else {
            self.retry_count += 1;
            Advance::Retried {
                retry: self.retry_count,
            }
        }
    }

    /// Record the finished tick's result. Called at the *end* of a tick;
    /// consumed by the *next* tick's `advance()`.
    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.last_outcome = outcome;
    }

    /// Bump the counter without a rotation decision (manual correction path).
    pub fn increment_counter(&mut self) {
        self.session_counter += 1;
    }
}
