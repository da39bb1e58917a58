//! Scenario exposure: what the book owes (or keeps) if one axis of an
//! event resolves a given way, summed over open wagers.
//!
//! Buckets are independent. A spread wager on HOME is assumed to cover in
//! `HOME_wins` and fail in `AWAY_wins`; a total wager on OVER wins in `OVER`
//! and loses in `UNDER`. There is no joint or probability-weighted view.

use std::fmt;

use bookline::{
    Cents, Comparison, EventId, MarketType, Odds, PickSide, SettleError, Wager, format_cents,
};
use rustc_hash::FxHashMap;

/// A hypothetical resolution of one axis of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    HomeWins,
    AwayWins,
    Draw,
    Over,
    Under,
}

impl Scenario {
    /// Report order.
    pub const ALL: [Scenario; 5] = [
        Scenario::HomeWins,
        Scenario::AwayWins,
        Scenario::Draw,
        Scenario::Over,
        Scenario::Under,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::HomeWins => "HOME_wins",
            Scenario::AwayWins => "AWAY_wins",
            Scenario::Draw => "DRAW",
            Scenario::Over => "OVER",
            Scenario::Under => "UNDER",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Buckets a market contributes to. DRAW is populated by three-way only.
    fn for_market(market: MarketType) -> &'static [Scenario] {
        match market {
            MarketType::Moneyline | MarketType::Spread => &[Scenario::HomeWins, Scenario::AwayWins],
            MarketType::Threeway => &[Scenario::HomeWins, Scenario::AwayWins, Scenario::Draw],
            MarketType::Total => &[Scenario::Over, Scenario::Under],
        }
    }

    /// Whether a pick on `side` wins if this scenario happens.
    fn backs(self, side: PickSide) -> bool {
        matches!(
            (self, side),
            (Scenario::HomeWins, PickSide::Home)
                | (Scenario::AwayWins, PickSide::Away)
                | (Scenario::Draw, PickSide::Draw)
                | (Scenario::Over, PickSide::Over)
                | (Scenario::Under, PickSide::Under)
        )
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Book's change in cash for one leg: pays net winnings on a bettor win,
/// keeps the stake on a loss.
///
/// ```
/// use bookline::{Comparison, Odds};
/// use bookline_risk::exposure::risk_delta;
///
/// assert_eq!(risk_delta(100_00, Odds(1_9100), Comparison::Win), -91_00);
/// assert_eq!(risk_delta(100_00, Odds(1_9100), Comparison::Push), 0);
/// assert_eq!(risk_delta(100_00, Odds(1_9100), Comparison::Lose), 100_00);
/// ```
pub fn risk_delta(stake: Cents, odds: Odds, cmp: Comparison) -> Cents {
    match cmp {
        Comparison::Win => -odds.net_winnings(stake),
        Comparison::Push => 0,
        Comparison::Lose => stake,
    }
}

/// Signed exposure per scenario, plus the open handle it was computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposureReport {
    buckets: [Cents; 5],
    wager_count: usize,
    handle_cents: Cents,
}

impl ExposureReport {
    /// Add one open wager. Settled wagers are ignored.
    pub fn add(&mut self, wager: &Wager) -> Result<(), SettleError> {
        if !wager.is_open() {
            return Ok(());
        }
        if !wager.market.accepts(wager.side) {
            return Err(SettleError::InvalidMarket {
                market: wager.market,
                side: wager.side,
            });
        }
        let legs = wager.legs()?;
        for &scenario in Scenario::for_market(wager.market) {
            let cmp = if scenario.backs(wager.side) {
                Comparison::Win
            } else {
                Comparison::Lose
            };
            let delta = legs
                .iter()
                .map(|leg| risk_delta(leg.stake_cents, leg.odds, cmp))
                .fold(0_i64, |acc, d| acc.saturating_add(d));
            let bucket = &mut self.buckets[scenario.index()];
            *bucket = bucket.saturating_add(delta);
        }
        self.wager_count += 1;
        self.handle_cents = self.handle_cents.saturating_add(wager.stake_cents);
        Ok(())
    }

    pub fn get(&self, scenario: Scenario) -> Cents {
        self.buckets[scenario.index()]
    }

    /// Scenarios and amounts in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, Cents)> + '_ {
        Scenario::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// `(scenario name, "±N.NN")` pairs, always all five in report order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(s, amount)| (s.name(), format_cents(amount)))
            .collect()
    }

    /// Scenario with the most negative exposure, if any bucket is negative.
    pub fn worst(&self) -> Option<(Scenario, Cents)> {
        self.iter()
            .filter(|(_, amount)| *amount < 0)
            .min_by_key(|(_, amount)| *amount)
    }

    /// Open wagers counted.
    pub fn wager_count(&self) -> usize {
        self.wager_count
    }

    /// Total open stake counted.
    pub fn handle_cents(&self) -> Cents {
        self.handle_cents
    }
}

impl fmt::Display for ExposureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "EXPOSURE ({} open wagers, handle {}):",
            self.wager_count,
            format_cents(self.handle_cents)
        )?;
        for (name, amount) in self.entries() {
            writeln!(f, "  {name:<10} {amount:>12}")?;
        }
        Ok(())
    }
}

/// Exposure over a set of wagers, normally the open wagers of one event.
///
/// Fails on the first wager with an invalid market/side combination or a
/// split wager missing its secondary line.
pub fn compute_exposure(wagers: &[Wager]) -> Result<ExposureReport, SettleError> {
    let mut report = ExposureReport::default();
    for wager in wagers {
        report.add(wager)?;
    }
    Ok(report)
}

/// Exposure for each event present in `wagers`, in event id order.
pub fn exposure_by_event(wagers: &[Wager]) -> Result<Vec<(EventId, ExposureReport)>, SettleError> {
    let mut by_event: FxHashMap<EventId, ExposureReport> = FxHashMap::default();
    for wager in wagers {
        by_event.entry(wager.event_id).or_default().add(wager)?;
    }
    let mut reports: Vec<_> = by_event.into_iter().collect();
    reports.sort_by_key(|(event, _)| *event);
    Ok(reports)
}
