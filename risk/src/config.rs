//! Risk configuration.

use bookline::Cents;

/// Exposure limits for the risk engine. A limit of `0` disables its check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskConfig {
    /// Largest loss the book accepts in any single scenario, in cents.
    pub max_liability_cents: Cents,
    /// Scenario loss above which a warning is raised, in cents.
    pub warn_liability_cents: Cents,
    /// Max total open stake on one event, in cents.
    pub max_handle_cents: Cents,
}

impl RiskConfig {
    /// Validate the config. Returns `Err` with a description if any field is nonsensical.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_liability_cents < 0 {
            return Err(format!(
                "max_liability_cents must be >= 0, got {}",
                self.max_liability_cents
            ));
        }
        if self.warn_liability_cents < 0 {
            return Err(format!(
                "warn_liability_cents must be >= 0, got {}",
                self.warn_liability_cents
            ));
        }
        if self.max_liability_cents > 0 && self.warn_liability_cents > self.max_liability_cents {
            return Err(format!(
                "warn_liability_cents ({}) must not exceed max_liability_cents ({})",
                self.warn_liability_cents, self.max_liability_cents
            ));
        }
        if self.max_handle_cents < 0 {
            return Err(format!(
                "max_handle_cents must be >= 0, got {}",
                self.max_handle_cents
            ));
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_liability_cents: 5_000_000,   // 50K
            warn_liability_cents: 2_500_000,  // 25K
            max_handle_cents: 50_000_000,     // 500K
        }
    }
}
