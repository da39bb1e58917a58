//! Wager records and their lifecycle.

use std::fmt;

use crate::error::SettleError;
use crate::market::{MarketType, PickSide};
use crate::odds::{Line, Odds};
use crate::types::{BettorId, BookmakerId, Cents, EventId, QuoteId, RunnerId, Timestamp, WagerId};

/// Final label of a settled wager, derived from its total profit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WagerResult {
    Win,
    Lose,
    Push,
}

impl WagerResult {
    /// `> 0` is a win, `< 0` a loss, `0` a push.
    ///
    /// A split wager whose legs cancel out is labelled a push even though
    /// neither leg pushed.
    pub fn from_profit(profit_cents: Cents) -> Self {
        match profit_cents.signum() {
            1 => WagerResult::Win,
            -1 => WagerResult::Lose,
            _ => WagerResult::Push,
        }
    }
}

impl fmt::Display for WagerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerResult::Win => write!(f, "win"),
            WagerResult::Lose => write!(f, "lose"),
            WagerResult::Push => write!(f, "push"),
        }
    }
}

/// Fields written back to a wager when it is graded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    pub result: WagerResult,
    pub payout_cents: Cents,
    /// Bettor's profit: `payout − stake` summed over legs.
    pub profit_cents: Cents,
    pub settled_at: Timestamp,
}

/// Lifecycle: `Open` → `Settled`. One-way; settled is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "lowercase"))]
pub enum WagerStatus {
    #[default]
    Open,
    Settled(Settlement),
}

/// One independently graded slice of a wager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leg {
    pub stake_cents: Cents,
    pub line: Option<Line>,
    pub odds: Odds,
}

/// The legs a wager is graded as: one, or two half-stake legs when split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Legs {
    pub first: Leg,
    pub second: Option<Leg>,
}

impl Legs {
    pub fn iter(&self) -> impl Iterator<Item = &Leg> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }

    pub fn is_split(&self) -> bool {
        self.second.is_some()
    }
}

/// A wager as held by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wager {
    pub id: WagerId,
    pub event_id: EventId,
    pub bookmaker_id: BookmakerId,
    pub runner_id: RunnerId,
    pub bettor_id: BettorId,
    /// Quote the wager was matched against, if one existed at placement.
    pub quote_id: Option<QuoteId>,
    pub market: MarketType,
    pub side: PickSide,
    pub line: Option<Line>,
    /// Second leg line, used only for split Asian-handicap wagers.
    pub line_b: Option<Line>,
    pub odds: Odds,
    pub odds_b: Option<Odds>,
    pub stake_cents: Cents,
    pub asian: bool,
    pub placed_at: Timestamp,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub status: WagerStatus,
}

impl Wager {
    /// A new open wager with no line, not Asian, and default party ids.
    pub fn new(
        id: WagerId,
        event_id: EventId,
        market: MarketType,
        side: PickSide,
        odds: Odds,
        stake_cents: Cents,
    ) -> Self {
        Self {
            id,
            event_id,
            bookmaker_id: BookmakerId::default(),
            runner_id: RunnerId::default(),
            bettor_id: BettorId::default(),
            quote_id: None,
            market,
            side,
            line: None,
            line_b: None,
            odds,
            odds_b: None,
            stake_cents,
            asian: false,
            placed_at: 0,
            status: WagerStatus::Open,
        }
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    /// Mark as Asian handicap with a caller-supplied second line and price.
    pub fn with_asian(mut self, line_b: Line, odds_b: Odds) -> Self {
        self.asian = true;
        self.line_b = Some(line_b);
        self.odds_b = Some(odds_b);
        self
    }

    pub fn with_runner(mut self, runner_id: RunnerId) -> Self {
        self.runner_id = runner_id;
        self
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == WagerStatus::Open
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.status {
            WagerStatus::Open => None,
            WagerStatus::Settled(s) => Some(s),
        }
    }

    /// The primary line, or `None` for markets without lines.
    pub fn effective_line(&self) -> Option<Line> {
        if self.market.has_line() { self.line } else { None }
    }

    /// Split into two legs only when flagged Asian and the primary line has a
    /// fractional part. Moneyline and three-way wagers never split.
    pub fn is_split(&self) -> bool {
        self.asian && self.effective_line().is_some_and(Line::is_fractional)
    }

    /// Price for the second leg; falls back to the primary price when the
    /// secondary one is absent or below 1.0.
    pub fn secondary_odds(&self) -> Odds {
        match self.odds_b {
            Some(odds) if odds >= Odds::ONE => odds,
            _ => self.odds,
        }
    }

    /// Break the wager into the legs it is graded as.
    pub fn legs(&self) -> Result<Legs, SettleError> {
        if !self.is_split() {
            return Ok(Legs {
                first: Leg {
                    stake_cents: self.stake_cents,
                    line: self.effective_line(),
                    odds: self.odds,
                },
                second: None,
            });
        }

        let line_b = self
            .line_b
            .ok_or(SettleError::MissingSecondaryLine(self.market))?;
        let half = self.stake_cents / 2;
        Ok(Legs {
            first: Leg {
                stake_cents: half,
                line: self.line,
                odds: self.odds,
            },
            second: Some(Leg {
                stake_cents: half,
                line: Some(line_b),
                odds: self.secondary_odds(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(line: i32) -> Wager {
        Wager::new(
            WagerId(1),
            EventId(1),
            MarketType::Spread,
            PickSide::Home,
            Odds(1_9500),
            100_00,
        )
        .with_line(Line(line))
    }

    #[test]
    fn result_from_profit() {
        assert_eq!(WagerResult::from_profit(1), WagerResult::Win);
        assert_eq!(WagerResult::from_profit(0), WagerResult::Push);
        assert_eq!(WagerResult::from_profit(-1), WagerResult::Lose);
        assert_eq!(WagerResult::Win.to_string(), "win");
    }

    #[test]
    fn whole_and_half_lines_without_asian_flag_do_not_split() {
        assert!(!spread(-3_00).is_split());
        assert!(!spread(-3_25).is_split());
    }

    #[test]
    fn asian_split_requires_fractional_line() {
        assert!(!spread(-3_00).with_asian(Line(-3_50), Odds(1_9000)).is_split());
        assert!(spread(-3_25).with_asian(Line(-3_50), Odds(1_9000)).is_split());
        assert!(spread(-3_50).with_asian(Line(-4_00), Odds(1_9000)).is_split());
    }

    #[test]
    fn moneyline_never_splits() {
        let mut w = Wager::new(
            WagerId(1),
            EventId(1),
            MarketType::Moneyline,
            PickSide::Home,
            Odds(1_9100),
            100_00,
        )
        .with_asian(Line(50), Odds(1_9000));
        w.line = Some(Line(25));
        assert!(!w.is_split());
        assert_eq!(w.effective_line(), None);
        let legs = w.legs().unwrap();
        assert!(!legs.is_split());
        assert_eq!(legs.first.line, None);
    }

    #[test]
    fn split_legs_halve_stake() {
        let mut w = spread(-3_25).with_asian(Line(-3_50), Odds(1_9000));
        w.stake_cents = 101;
        let legs = w.legs().unwrap();
        assert_eq!(legs.first.stake_cents, 50);
        assert_eq!(legs.second.unwrap().stake_cents, 50);
        assert_eq!(legs.first.line, Some(Line(-3_25)));
        assert_eq!(legs.second.unwrap().line, Some(Line(-3_50)));
        assert_eq!(legs.second.unwrap().odds, Odds(1_9000));
        assert_eq!(legs.iter().count(), 2);
    }

    #[test]
    fn split_without_secondary_line_fails() {
        let mut w = spread(-3_25).with_asian(Line(-3_50), Odds(1_9000));
        w.line_b = None;
        assert_eq!(
            w.legs(),
            Err(SettleError::MissingSecondaryLine(MarketType::Spread))
        );
    }

    #[test]
    fn secondary_odds_fallback() {
        let mut w = spread(-3_25).with_asian(Line(-3_50), Odds(1_8000));
        assert_eq!(w.secondary_odds(), Odds(1_8000));
        w.odds_b = Some(Odds(9000));
        assert_eq!(w.secondary_odds(), Odds(1_9500));
        w.odds_b = None;
        assert_eq!(w.secondary_odds(), Odds(1_9500));
    }

    #[test]
    fn status_lifecycle() {
        let mut w = spread(-3_00);
        assert!(w.is_open());
        assert!(w.settlement().is_none());
        w.status = WagerStatus::Settled(Settlement {
            result: WagerResult::Push,
            payout_cents: 100_00,
            profit_cents: 0,
            settled_at: 10,
        });
        assert!(!w.is_open());
        assert_eq!(w.settlement().unwrap().payout_cents, 100_00);
    }
}
