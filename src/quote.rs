//! Bookmaker price quotes, and the lookup key wagers are matched with.

use crate::error::ValidationError;
use crate::market::{MarketType, PickSide};
use crate::odds::{Line, Odds};
use crate::types::{BookmakerId, EventId, QuoteId, Timestamp};

/// A price a bookmaker offered on one selection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    pub id: QuoteId,
    pub event_id: EventId,
    pub bookmaker_id: BookmakerId,
    pub market: MarketType,
    pub side: PickSide,
    pub line: Option<Line>,
    pub asian: bool,
    pub line_b: Option<Line>,
    pub odds: Odds,
    pub odds_b: Option<Odds>,
    pub captured_at: Timestamp,
}

impl Quote {
    /// Check invariants and normalize: lines are dropped on markets without
    /// lines, secondary fields are dropped on non-Asian quotes.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if !self.market.accepts(self.side) {
            return Err(ValidationError::InvalidMarket {
                market: self.market,
                side: self.side,
            });
        }
        if !self.odds.is_valid() {
            return Err(ValidationError::PriceTooLow(self.odds.to_string()));
        }
        if self.market.has_line() {
            if self.line.is_none() {
                return Err(ValidationError::MissingLine(self.market));
            }
        } else {
            self.line = None;
        }
        if self.asian {
            let line_ok = self.line_b.is_some_and(|l| l != Line::ZERO);
            let odds_ok = self.odds_b.is_some_and(Odds::is_valid);
            if !line_ok || !odds_ok {
                return Err(ValidationError::AsianLegs);
            }
        } else {
            self.line_b = None;
            self.odds_b = None;
        }
        Ok(self)
    }

    pub fn key(&self) -> QuoteKey {
        QuoteKey {
            event_id: self.event_id,
            bookmaker_id: self.bookmaker_id,
            market: self.market,
            side: self.side,
            line: self.line,
        }
    }
}

/// Identifies the selection a wager is placed on, for quote lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub event_id: EventId,
    pub bookmaker_id: BookmakerId,
    pub market: MarketType,
    pub side: PickSide,
    /// Compared only for markets that carry a line.
    pub line: Option<Line>,
}

impl QuoteKey {
    pub fn matches(&self, quote: &Quote) -> bool {
        quote.event_id == self.event_id
            && quote.bookmaker_id == self.bookmaker_id
            && quote.market == self.market
            && quote.side == self.side
            && (!self.market.has_line() || quote.line == self.line)
    }
}
