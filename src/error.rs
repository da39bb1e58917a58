//! Error types for validation, ledger access, and settlement.

use crate::market::{MarketType, PickSide};
use crate::types::{EventId, WagerId};

/// Errors returned when parsing or validating caller-supplied inputs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid decimal {0:?}")]
    InvalidDecimal(String),

    #[error("{value:?} has more than {max} fractional digits")]
    Precision { value: String, max: u32 },

    #[error("unknown market {0:?}")]
    UnknownMarket(String),

    #[error("unknown side {0:?}")]
    UnknownSide(String),

    #[error("unknown commission scheme {0:?}")]
    UnknownScheme(String),

    #[error("{market} market does not accept side {side}")]
    InvalidMarket { market: MarketType, side: PickSide },

    #[error("price must be greater than 1.0, got {0}")]
    PriceTooLow(String),

    #[error("stake must be greater than zero")]
    ZeroStake,

    #[error("{0} market requires a line")]
    MissingLine(MarketType),

    #[error("asian wager requires a secondary line and a secondary price above 1.0")]
    AsianLegs,

    #[error("commission rate must be within 0-100%, got {0}")]
    RateOutOfRange(String),

    #[error("score already final for event {0}")]
    EventFinal(EventId),

    #[error("unknown event {0}")]
    UnknownEvent(EventId),
}

/// Errors raised by a [`Ledger`](crate::Ledger) implementation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown wager {0}")]
    UnknownWager(WagerId),

    #[error("unknown event {0}")]
    UnknownEvent(EventId),

    #[error("wager {0} is already settled")]
    AlreadySettled(WagerId),

    #[error("commission for wager {0} already recorded")]
    DuplicateCommission(WagerId),

    #[error("write failed: {0}")]
    Write(String),
}

/// Errors raised while grading wagers or running a settlement batch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettleError {
    #[error("{market} market does not accept side {side}")]
    InvalidMarket { market: MarketType, side: PickSide },

    #[error("{0} market requires a line")]
    MissingLine(MarketType),

    #[error("split {0} wager requires a secondary line")]
    MissingSecondaryLine(MarketType),

    #[error("event {0} is not final")]
    EventNotFinal(EventId),

    #[error("event {0} not found")]
    EventNotFound(EventId),

    #[error("persisting wager {wager} of event {event} failed: {source}")]
    Persistence {
        event: EventId,
        wager: WagerId,
        #[source]
        source: LedgerError,
    },
}

impl SettleError {
    /// True for errors caused by malformed wager data rather than ledger state.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SettleError::InvalidMarket { .. }
                | SettleError::MissingLine(_)
                | SettleError::MissingSecondaryLine(_)
        )
    }

    /// True for precondition failures detected before any grading starts.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SettleError::EventNotFinal(_) | SettleError::EventNotFound(_)
        )
    }
}
