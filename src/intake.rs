//! Recording inputs into a ledger: events, scores, quotes, wagers and runner
//! commission settings. Everything is validated before it is written.

use log::{debug, info};

use crate::commission::CommissionConfig;
use crate::comparator::Score;
use crate::error::{LedgerError, ValidationError};
use crate::event::{Event, EventOutcome};
use crate::ledger::Ledger;
use crate::market::{MarketType, PickSide};
use crate::odds::{Line, Odds};
use crate::quote::{Quote, QuoteKey};
use crate::types::{
    BettorId, BookmakerId, Cents, EventId, QuoteId, RunnerId, Timestamp, WagerId, format_cents,
};
use crate::wager::{Wager, WagerStatus};

/// Errors from recording inputs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// A wager as requested by a bettor, before it has an id or a quote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WagerTicket {
    pub event_id: EventId,
    pub bookmaker_id: BookmakerId,
    pub runner_id: RunnerId,
    pub bettor_id: BettorId,
    pub market: MarketType,
    pub side: PickSide,
    pub line: Option<Line>,
    pub line_b: Option<Line>,
    pub odds: Odds,
    pub odds_b: Option<Odds>,
    pub stake_cents: Cents,
    pub asian: bool,
}

impl WagerTicket {
    /// Check invariants and normalize lines for markets without them.
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
        if self.stake_cents <= 0 {
            return Err(ValidationError::ZeroStake);
        }
        if !self.market.has_line() {
            self.line = None;
            self.line_b = None;
        } else if self.line.is_none() {
            return Err(ValidationError::MissingLine(self.market));
        }
        if self.asian {
            if !self.odds_b.is_some_and(Odds::is_valid) {
                return Err(ValidationError::AsianLegs);
            }
            let splits = self.line.is_some_and(Line::is_fractional);
            if splits && self.line_b.is_none() {
                return Err(ValidationError::AsianLegs);
            }
        } else {
            self.line_b = None;
            self.odds_b = None;
        }
        Ok(self)
    }

    /// The open wager this ticket becomes, before the ledger assigns its id.
    pub fn into_wager(self, quote_id: Option<QuoteId>, placed_at: Timestamp) -> Wager {
        Wager {
            id: WagerId::default(),
            event_id: self.event_id,
            bookmaker_id: self.bookmaker_id,
            runner_id: self.runner_id,
            bettor_id: self.bettor_id,
            quote_id,
            market: self.market,
            side: self.side,
            line: self.line,
            line_b: self.line_b,
            odds: self.odds,
            odds_b: self.odds_b,
            stake_cents: self.stake_cents,
            asian: self.asian,
            placed_at,
            status: WagerStatus::Open,
        }
    }

    fn quote_key(&self) -> QuoteKey {
        QuoteKey {
            event_id: self.event_id,
            bookmaker_id: self.bookmaker_id,
            market: self.market,
            side: self.side,
            line: self.line,
        }
    }
}

fn open_event<L: Ledger + ?Sized>(ledger: &L, id: EventId) -> Result<Event, ValidationError> {
    let event = ledger.event(id).ok_or(ValidationError::UnknownEvent(id))?;
    if event.is_final() {
        return Err(ValidationError::EventFinal(id));
    }
    Ok(event)
}

/// Create an event with no score.
pub fn create_event<L: Ledger + ?Sized>(
    ledger: &mut L,
    home_team: &str,
    away_team: &str,
) -> Result<EventId, IntakeError> {
    let id = ledger.insert_event(Event::new(EventId::default(), home_team, away_team))?;
    info!("Created event {id}: {home_team} vs {away_team}");
    Ok(id)
}

/// Record a score. Once an event is final its score can no longer change.
pub fn record_score<L: Ledger + ?Sized>(
    ledger: &mut L,
    event: EventId,
    home: u32,
    away: u32,
    finalize: bool,
) -> Result<(), IntakeError> {
    open_event(ledger, event)?;
    let outcome = EventOutcome {
        score: Score::new(home, away),
        finalized: finalize,
    };
    ledger.record_outcome(event, outcome)?;
    info!(
        "Event {event} score {home}-{away}{}",
        if finalize { " (final)" } else { "" }
    );
    Ok(())
}

/// Store a bookmaker quote after validation.
pub fn add_quote<L: Ledger + ?Sized>(ledger: &mut L, quote: Quote) -> Result<QuoteId, IntakeError> {
    let quote = quote.validated()?;
    open_event(ledger, quote.event_id)?;
    let id = ledger.insert_quote(quote)?;
    debug!("Stored quote {id}");
    Ok(id)
}

/// Validate a ticket, match it to the latest quote for its selection, and
/// insert it as an open wager.
///
/// The quote id found by the lookup is carried into the insert directly;
/// a wager with no matching quote is stored with `quote_id: None`.
pub fn place_wager<L: Ledger + ?Sized>(
    ledger: &mut L,
    ticket: WagerTicket,
    placed_at: Timestamp,
) -> Result<WagerId, IntakeError> {
    let ticket = ticket.validated()?;
    open_event(ledger, ticket.event_id)?;

    let quote_id = ledger.latest_quote(&ticket.quote_key()).map(|q| q.id);
    if quote_id.is_none() {
        debug!(
            "No quote for {} {} on {}; placing unmatched",
            ticket.market, ticket.side, ticket.event_id
        );
    }

    let (market, side, odds, stake) = (ticket.market, ticket.side, ticket.odds, ticket.stake_cents);
    let id = ledger.insert_wager(ticket.into_wager(quote_id, placed_at))?;
    info!(
        "Placed wager {id}: {market} {side} @ {odds} stake {}",
        format_cents(stake)
    );
    Ok(id)
}

/// Set (or replace) a runner's commission scheme and rate.
///
/// Existing commission records keep the scheme and rate they were computed with.
pub fn configure_runner<L: Ledger + ?Sized>(
    ledger: &mut L,
    runner: RunnerId,
    config: CommissionConfig,
) -> Result<(), IntakeError> {
    let rate = config.rate.validate()?;
    ledger.set_commission_config(runner, CommissionConfig { rate, ..config })?;
    info!("Runner {runner} commission: {} {}", config.scheme, rate);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::CommissionRate;
    use crate::ledger::MemoryLedger;

    fn ledger_with_event() -> (MemoryLedger, EventId) {
        let mut ledger = MemoryLedger::new();
        let event = create_event(&mut ledger, "Lions", "Bears").unwrap();
        (ledger, event)
    }

    fn ticket(event: EventId) -> WagerTicket {
        WagerTicket {
            event_id: event,
            bookmaker_id: BookmakerId(1),
            runner_id: RunnerId(1),
            bettor_id: BettorId(1),
            market: MarketType::Spread,
            side: PickSide::Home,
            line: Some(Line(-3_00)),
            line_b: None,
            odds: Odds(1_9500),
            odds_b: None,
            stake_cents: 200_00,
            asian: false,
        }
    }

    fn quote(event: EventId, line: i32) -> Quote {
        Quote {
            id: QuoteId::default(),
            event_id: event,
            bookmaker_id: BookmakerId(1),
            market: MarketType::Spread,
            side: PickSide::Home,
            line: Some(Line(line)),
            asian: false,
            line_b: None,
            odds: Odds(1_9500),
            odds_b: None,
            captured_at: 0,
        }
    }

    #[test]
    fn wager_links_latest_matching_quote() {
        let (mut ledger, event) = ledger_with_event();
        add_quote(&mut ledger, quote(event, -3_00)).unwrap();
        let latest = add_quote(&mut ledger, quote(event, -3_00)).unwrap();
        add_quote(&mut ledger, quote(event, -3_50)).unwrap();

        let id = place_wager(&mut ledger, ticket(event), 100).unwrap();
        let wager = ledger.wager(id).unwrap();
        assert_eq!(wager.quote_id, Some(latest));
        assert_eq!(wager.placed_at, 100);
        assert!(wager.is_open());
    }

    #[test]
    fn wager_without_quote_is_unmatched() {
        let (mut ledger, event) = ledger_with_event();
        let id = place_wager(&mut ledger, ticket(event), 0).unwrap();
        assert_eq!(ledger.wager(id).unwrap().quote_id, None);
    }

    #[test]
    fn moneyline_line_forced_absent() {
        let (mut ledger, event) = ledger_with_event();
        let t = WagerTicket {
            market: MarketType::Moneyline,
            line: Some(Line(-1_50)),
            ..ticket(event)
        };
        let id = place_wager(&mut ledger, t, 0).unwrap();
        assert_eq!(ledger.wager(id).unwrap().line, None);
    }

    #[test]
    fn rejects_bad_tickets() {
        let (mut ledger, event) = ledger_with_event();
        let zero = WagerTicket { stake_cents: 0, ..ticket(event) };
        assert_eq!(
            place_wager(&mut ledger, zero, 0),
            Err(IntakeError::Invalid(ValidationError::ZeroStake))
        );
        let cheap = WagerTicket { odds: Odds::ONE, ..ticket(event) };
        assert!(place_wager(&mut ledger, cheap, 0).is_err());
        let no_line = WagerTicket { line: None, ..ticket(event) };
        assert_eq!(
            place_wager(&mut ledger, no_line, 0),
            Err(IntakeError::Invalid(ValidationError::MissingLine(
                MarketType::Spread
            )))
        );
        let asian = WagerTicket {
            asian: true,
            line: Some(Line(-3_25)),
            odds_b: Some(Odds(1_9000)),
            ..ticket(event)
        };
        assert_eq!(
            place_wager(&mut ledger, asian, 0),
            Err(IntakeError::Invalid(ValidationError::AsianLegs))
        );
        let unknown = ticket(EventId(99));
        assert_eq!(
            place_wager(&mut ledger, unknown, 0),
            Err(IntakeError::Invalid(ValidationError::UnknownEvent(EventId(99))))
        );
    }

    #[test]
    fn final_event_is_closed() {
        let (mut ledger, event) = ledger_with_event();
        record_score(&mut ledger, event, 24, 21, true).unwrap();
        assert_eq!(
            record_score(&mut ledger, event, 0, 0, false),
            Err(IntakeError::Invalid(ValidationError::EventFinal(event)))
        );
        assert!(place_wager(&mut ledger, ticket(event), 0).is_err());
        assert!(add_quote(&mut ledger, quote(event, -3_00)).is_err());
    }

    #[test]
    fn interim_scores_can_be_updated() {
        let (mut ledger, event) = ledger_with_event();
        record_score(&mut ledger, event, 7, 0, false).unwrap();
        record_score(&mut ledger, event, 14, 7, false).unwrap();
        let outcome = ledger.event(event).unwrap().outcome;
        assert_eq!(outcome.score.home, 14);
        assert!(!outcome.finalized);
    }

    #[test]
    fn configure_runner_validates_rate() {
        let mut ledger = MemoryLedger::new();
        let bad = CommissionConfig::net(CommissionRate(100_01));
        assert!(configure_runner(&mut ledger, RunnerId(1), bad).is_err());
        let good = CommissionConfig::handle(CommissionRate(5_00));
        configure_runner(&mut ledger, RunnerId(1), good).unwrap();
        assert_eq!(ledger.commission_config(RunnerId(1)), Some(good));
    }
}
