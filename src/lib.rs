// Allow our dollar.cents digit grouping convention (e.g., 100_00 = 100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # bookline
//!
//! Deterministic wager settlement, runner commission and exposure bookkeeping
//! for a sportsbook.
//!
//! ## Features
//!
//! - **Markets**: moneyline, three-way, spread (handicap) and total (over/under)
//! - **Asian handicap**: quarter lines split into two half-stake legs
//! - **Commission**: net (share of the book's win) or handle (share of stake)
//! - **Fixed-point money**: odds, lines and rates are scaled integers, amounts are cents
//! - **Ledger seam**: settlement runs against any [`Ledger`]; [`MemoryLedger`] is included
//!
//! ## Quick Start
//!
//! ```
//! use bookline::{
//!     settle_event, EventId, EventOutcome, Event, Ledger, MarketType, MemoryLedger, Odds,
//!     PickSide, Wager, WagerId, WagerResult,
//! };
//!
//! let mut event = Event::new(EventId(1), "Lions", "Bears");
//! event.outcome = EventOutcome::final_score(2, 1);
//!
//! let mut ledger = MemoryLedger::builder()
//!     .with_event(event)
//!     .with_wager(Wager::new(WagerId(1), EventId(1), MarketType::Moneyline, PickSide::Home, Odds(1_9100), 100_00))
//!     .build();
//!
//! let run = settle_event(&mut ledger, EventId(1), 1_700_000_000).unwrap();
//! assert_eq!(run.graded.len(), 1);
//!
//! let settled = ledger.wager(WagerId(1)).unwrap();
//! let s = settled.settlement().unwrap();
//! assert_eq!(s.result, WagerResult::Win);
//! assert_eq!(s.payout_cents, 191_00);
//! assert_eq!(s.profit_cents, 91_00);
//! ```
//!
//! ## Fixed-Point Representation
//!
//! | Quantity | Type | Scale | Example |
//! |----------|------|-------|---------|
//! | Decimal odds | [`Odds`] | 1/10 000 | `Odds(1_9100)` = 1.91 |
//! | Handicap / total line | [`Line`] | 1/100 | `Line(-3_25)` = -3.25 |
//! | Commission rate | [`CommissionRate`] | 1/100 % | `CommissionRate(10_00)` = 10% |
//! | Money | [`Cents`] | 1/100 | `191_00` = 191.00 |
//!
//! ```
//! use bookline::{format_cents, Line, Odds};
//!
//! let odds: Odds = "1.91".parse().unwrap();
//! assert_eq!(odds, Odds(1_9100));
//! assert_eq!(odds.payout(100_00), 191_00);
//!
//! let line: Line = "-3.25".parse().unwrap();
//! assert!(line.is_fractional());
//! assert_eq!(format_cents(-4_100), "-41.00");
//! ```
//!
//! ## Asian Handicap
//!
//! A wager flagged Asian whose line has a fractional part is graded as two
//! legs, each staking half: one at the primary line and price, one at the
//! secondary line and price.
//!
//! ```
//! use bookline::{grade, EventId, Line, MarketType, Odds, PickSide, Score, Wager, WagerId};
//!
//! // OVER 44.5 / 45 for 100.00; 24 + 21 = 45 wins one leg and pushes the other.
//! let wager = Wager::new(WagerId(1), EventId(1), MarketType::Total, PickSide::Over, Odds(1_9000), 100_00)
//!     .with_line(Line(44_50))
//!     .with_asian(Line(45_00), Odds(1_8000));
//! let s = grade(&wager, Score::new(24, 21), 0).unwrap();
//! assert_eq!(s.payout_cents, 145_00);
//! assert_eq!(s.profit_cents, 45_00);
//! ```

mod commission;
mod comparator;
mod error;
mod event;
pub mod grader;
pub mod intake;
mod ledger;
mod market;
mod odds;
#[cfg(feature = "persistence")]
pub mod persistence;
mod quote;
mod settlement;
mod types;
mod wager;

// Re-export public API
pub use commission::{CommissionConfig, CommissionRate, CommissionRecord, CommissionScheme};
pub use comparator::{Comparison, Score, compare};
pub use error::{LedgerError, SettleError, ValidationError};
pub use event::{Event, EventOutcome};
pub use grader::{GradedWager, SettlementRun, WagerFailure, grade, preview_event, settle_event};
pub use intake::{IntakeError, WagerTicket};
pub use ledger::{Ledger, MemoryLedger, MemoryLedgerBuilder};
pub use market::{MarketType, PickSide};
pub use odds::{Line, Odds};
pub use quote::{Quote, QuoteKey};
pub use settlement::{LegResult, settle_leg};
pub use types::{
    BettorId, BookmakerId, Cents, EventId, QuoteId, RunnerId, Timestamp, WagerId, format_cents,
    parse_cents,
};
pub use wager::{Leg, Legs, Settlement, Wager, WagerResult, WagerStatus};
