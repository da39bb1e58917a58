//! Outcome of checking an exposure against the configured limits.

use std::fmt;

use bookline::{Cents, format_cents};
use serde::Serialize;

/// Severity of a single check. Ordered so that the worst status is the max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskStatus {
    Pass,
    Warn,
    Fail,
}

impl RiskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskStatus::Pass => "PASS",
            RiskStatus::Warn => "WARN",
            RiskStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One limit compared against one observed amount.
#[derive(Debug, Clone, Serialize)]
pub struct RiskCheck {
    pub name: &'static str,
    pub status: RiskStatus,
    pub observed_cents: Cents,
    /// `None` when the limit is disabled.
    pub limit_cents: Option<Cents>,
    pub detail: String,
}

impl RiskCheck {
    /// Amount left before the limit is reached; negative once breached.
    pub fn headroom(&self) -> Option<Cents> {
        self.limit_cents
            .map(|limit| limit.saturating_sub(self.observed_cents))
    }
}

/// Every check run for one exposure, in the order they ran.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskReport {
    pub checks: Vec<RiskCheck>,
}

impl RiskReport {
    pub fn has_failures(&self) -> bool {
        self.status() == RiskStatus::Fail
    }

    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status == RiskStatus::Warn)
    }

    /// Worst status across all checks; `Pass` for an empty report.
    pub fn status(&self) -> RiskStatus {
        self.checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(RiskStatus::Pass)
    }

    /// Checks that warned or failed.
    pub fn problems(&self) -> impl Iterator<Item = &RiskCheck> {
        self.checks.iter().filter(|c| c.status != RiskStatus::Pass)
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LIMITS [{}]:", self.status())?;
        for check in &self.checks {
            write!(f, "  [{}] {}: {}", check.status, check.name, check.detail)?;
            match check.headroom() {
                Some(room) if room >= 0 => writeln!(f, " (headroom {})", format_cents(room))?,
                Some(room) => writeln!(f, " (over by {})", format_cents(room.saturating_neg()))?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}
