use rota_rotation::SessionType;

/// Progressive degradation tiers, strictly simpler top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Full,
    Safe,
    Emergency,
}

impl Tier {
    /// Fallback order for one tick.
    pub const ORDER: [Tier; 3] = [Tier::Full, Tier::Safe, Tier::Emergency];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Full => "full",
            Tier::Safe => "safe",
            Tier::Emergency => "emergency",
        }
    }
}

/// Everything the runner needs to start the worker for one attempt.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub tier: Tier,
    pub session_type: SessionType,
    pub prompt: String,
    pub args: Vec<String>,
}

/// Session type used when nothing else can be trusted.
const EMERGENCY_SESSION: SessionType = SessionType::Build;

/// The emergency prompt lives in the binary; a corrupted state directory
/// cannot prevent this tier from being constructed.
const EMERGENCY_PROMPT: &str = "Run a minimal build session: pick the smallest useful change, \
make it, and commit. Skip all optional tooling.";

/// Build the launch plan for a tier. Full carries hooks, mode transforms,
/// and context enrichment; safe strips all of that down to the rotation
/// lookup and a minimal prompt; emergency is constants only.
pub fn build_plan(tier: Tier, slot: SessionType, extra_args: &[String]) -> LaunchPlan {
    match tier {
        Tier::Full => {
            let mut args = vec![
                "--session".into(),
                slot.name().into(),
                "--hooks".into(),
                "--enrich-context".into(),
                "--mode-transforms".into(),
            ];
            args.extend(extra_args.iter().cloned());
            LaunchPlan {
                tier,
                session_type: slot,
                prompt: format!(
                    "Run a {} session with full context. Consult the work queue for \
                     the assigned item and record progress notes as you go.",
                    slot.name()
                ),
                args,
            }
        }
        Tier::Safe => {
            let mut args = vec!["--session".into(), slot.name().into(), "--no-hooks".into()];
            args.extend(extra_args.iter().cloned());
            LaunchPlan {
                tier,
                session_type: slot,
                prompt: format!("Run a {} session. Keep it simple.", slot.name()),
                args,
            }
        }
        Tier::Emergency => LaunchPlan {
            tier,
            session_type: EMERGENCY_SESSION,
            prompt: EMERGENCY_PROMPT.into(),
            args: vec![
                "--session".into(),
                EMERGENCY_SESSION.name().into(),
                "--no-hooks".into(),
            ],
        },
    }
}
