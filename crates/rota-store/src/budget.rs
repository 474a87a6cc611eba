/// Environment variable carrying the per-session budget cap in USD.
pub const BUDGET_ENV: &str = "ROTA_BUDGET_USD";

/// Tracks cumulative cost for a tick and enforces the session budget cap.
pub struct Budget {
    cap: Option<f64>,
    spent: f64,
}

impl Budget {
    pub fn new(cap: Option<f64>) -> Self {
        Self { cap, spent: 0.0 }
    }

    /// Read the cap from `ROTA_BUDGET_USD`. Unset or unparsable means uncapped.
    pub fn from_env() -> Self {
        let cap = std::env::var(BUDGET_ENV)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0);
        Self::new(cap)
    }

    pub fn record(&mut self, cost: f64) {
        self.spent += cost;
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    pub fn remaining(&self) -> Option<f64> {
        self.cap.map(|c| (c - self.spent).max(0.0))
    }

    pub fn is_exhausted(&self) -> bool {
        self.cap.map(|c| self.spent >= c).unwrap_or(false)
    }

    /// True when the remaining budget has dropped below `threshold`.
    /// Uncapped budgets are never low.
    pub fn is_low(&self, threshold: f64) -> bool {
        self.remaining().map(|r| r < threshold).unwrap_or(false)
    }
}
