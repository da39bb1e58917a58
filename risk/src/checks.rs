//! Individual risk check implementations.

use bookline::{Cents, format_cents};

use crate::config::RiskConfig;
use crate::exposure::{ExposureReport, Scenario};
use crate::report::{RiskCheck, RiskReport, RiskStatus};

/// Returns `"<="` if the check passed, `">"` if it failed or warned.
fn cmp_symbol(status: RiskStatus) -> &'static str {
    if status == RiskStatus::Pass {
        "<="
    } else {
        ">"
    }
}

/// A configured limit; zero or negative disables it.
fn enabled(cents: Cents) -> Option<Cents> {
    (cents > 0).then_some(cents)
}

/// Renders a limit, or `"off"` when it is disabled.
fn limit(cents: Option<Cents>) -> String {
    cents.map_or_else(|| "off".into(), format_cents)
}

/// Liability of the worst scenario as a positive amount, or zero when the
/// book profits in every scenario.
fn worst_liability(exposure: &ExposureReport) -> (Option<Scenario>, Cents) {
    match exposure.worst() {
        Some((scenario, amount)) => (Some(scenario), amount.saturating_neg()),
        None => (None, 0),
    }
}

/// Per-scenario liability against the hard limit and the warn threshold.
fn check_liability(config: &RiskConfig, exposure: &ExposureReport, checks: &mut Vec<RiskCheck>) {
    let (scenario, liability) = worst_liability(exposure);
    let label = scenario.map_or("none", Scenario::name);

    let max = enabled(config.max_liability_cents);
    let status = if max.is_some_and(|max| liability > max) {
        RiskStatus::Fail
    } else {
        RiskStatus::Pass
    };
    checks.push(RiskCheck {
        name: "Max liability",
        status,
        observed_cents: liability,
        limit_cents: max,
        detail: format!(
            "{} ({}) {} {} limit",
            format_cents(liability),
            label,
            cmp_symbol(status),
            limit(max),
        ),
    });

    let warn = enabled(config.warn_liability_cents);
    if let Some(warn) = warn.filter(|&warn| liability > warn && status == RiskStatus::Pass) {
        checks.push(RiskCheck {
            name: "Liability warning",
            status: RiskStatus::Warn,
            observed_cents: liability,
            limit_cents: Some(warn),
            detail: format!(
                "{} ({}) > {} warn threshold",
                format_cents(liability),
                label,
                format_cents(warn),
            ),
        });
    }
}

/// Total open stake against the handle limit.
fn check_handle(config: &RiskConfig, exposure: &ExposureReport, checks: &mut Vec<RiskCheck>) {
    let handle = exposure.handle_cents();
    let max = enabled(config.max_handle_cents);
    let status = if max.is_some_and(|max| handle > max) {
        RiskStatus::Fail
    } else {
        RiskStatus::Pass
    };
    checks.push(RiskCheck {
        name: "Max open handle",
        status,
        observed_cents: handle,
        limit_cents: max,
        detail: format!(
            "{} over {} wagers {} {} limit",
            format_cents(handle),
            exposure.wager_count(),
            cmp_symbol(status),
            limit(max),
        ),
    });
}

/// Run all risk checks for an event's exposure.
pub fn check_exposure(config: &RiskConfig, exposure: &ExposureReport) -> RiskReport {
    let mut checks = Vec::new();
    check_liability(config, exposure, &mut checks);
    check_handle(config, exposure, &mut checks);
    RiskReport { checks }
}
