//! Core types: identifiers, Timestamp, and minor-unit amount formatting.

use std::fmt;

use crate::error::ValidationError;
use crate::odds::parse_fixed;

/// Amount in minor currency units (e.g., cents). `100_00` is 100.00.
pub type Cents = i64;

/// Timestamp in seconds since the Unix epoch, supplied by the caller.
pub type Timestamp = i64;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Wager (bet) identifier assigned by the ledger.
    WagerId, "W"
);
id_type!(
    /// Sporting event identifier.
    EventId, "E"
);
id_type!(
    /// Runner (agent) identifier. Runners earn commission on their bettors' wagers.
    RunnerId, "R"
);
id_type!(
    /// Bettor identifier.
    BettorId, "B"
);
id_type!(
    /// Bookmaker identifier.
    BookmakerId, "K"
);
id_type!(
    /// Quote identifier.
    QuoteId, "Q"
);

/// Render a minor-unit amount as a decimal string with two fractional digits.
///
/// ```
/// use bookline::format_cents;
///
/// assert_eq!(format_cents(-41_00), "-41.00");
/// assert_eq!(format_cents(-50), "-0.50");
/// assert_eq!(format_cents(45_00), "45.00");
/// ```
pub fn format_cents(amount: Cents) -> String {
    let units = amount.unsigned_abs() / 100;
    let frac = amount.unsigned_abs() % 100;
    if amount < 0 {
        format!("-{units}.{frac:02}")
    } else {
        format!("{units}.{frac:02}")
    }
}

/// Parse a decimal amount such as `"100"` or `"-0.5"` into minor units.
///
/// ```
/// use bookline::parse_cents;
///
/// assert_eq!(parse_cents("191").unwrap(), 191_00);
/// assert_eq!(parse_cents("-0.5").unwrap(), -50);
/// assert!(parse_cents("1.005").is_err());
/// ```
pub fn parse_cents(s: &str) -> Result<Cents, ValidationError> {
    parse_fixed(s, 2)
}
