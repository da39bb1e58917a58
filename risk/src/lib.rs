//! Exposure reporting and liability limits for bookline.
//!
//! Computes, per outcome scenario, what the book would owe over an event's
//! open wagers, and checks that exposure against configurable limits.

pub mod checks;
pub mod config;
pub mod exposure;
pub mod report;

pub use config::RiskConfig;
pub use exposure::{ExposureReport, Scenario, compute_exposure, exposure_by_event};
pub use report::{RiskCheck, RiskReport, RiskStatus};

use bookline::{SettleError, Wager};
use log::debug;

/// Exposure risk engine.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    /// Create a new risk engine with the given config.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails validation. Use [`RiskEngine::try_new`] for
    /// configs read at runtime.
    #[track_caller]
    pub fn new(config: RiskConfig) -> Self {
        if let Err(msg) = config.validate() {
            panic!("invalid RiskConfig: {msg}");
        }
        Self { config }
    }

    /// Create a risk engine, returning the validation message on a bad config.
    pub fn try_new(config: RiskConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the current config.
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Check a computed exposure against the limits.
    pub fn check_exposure(&self, exposure: &ExposureReport) -> RiskReport {
        checks::check_exposure(&self.config, exposure)
    }

    /// Compute exposure over an event's open wagers and check it.
    pub fn check_wagers(&self, wagers: &[Wager]) -> Result<(ExposureReport, RiskReport), SettleError> {
        let exposure = compute_exposure(wagers)?;
        let report = self.check_exposure(&exposure);
        debug!(
            "Exposure over {} wagers: {}",
            exposure.wager_count(),
            report.status()
        );
        Ok((exposure, report))
    }

    /// Check the exposure an event would have if `candidate` were accepted
    /// alongside its current open wagers.
    pub fn check_wager(&self, open: &[Wager], candidate: &Wager) -> Result<RiskReport, SettleError> {
        let mut exposure = compute_exposure(open)?;
        exposure.add(candidate)?;
        let report = self.check_exposure(&exposure);
        debug!("Pre-placement check for {}: {}", candidate.event_id, report.status());
        Ok(report)
    }
}
