//! Market types and pick sides.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Bet market type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarketType {
    /// Straight winner. No line.
    Moneyline,
    /// Home / draw / away. No line.
    Threeway,
    /// Point spread (handicap) applied to the picked team.
    Spread,
    /// Combined score over/under a line.
    Total,
}

impl MarketType {
    /// Markets that carry a line. Lines are forced absent on the others.
    #[inline]
    pub fn has_line(self) -> bool {
        matches!(self, MarketType::Spread | MarketType::Total)
    }

    /// Whether `side` is a recognized pick for this market.
    pub fn accepts(self, side: PickSide) -> bool {
        match self {
            MarketType::Moneyline | MarketType::Threeway => {
                matches!(side, PickSide::Home | PickSide::Away | PickSide::Draw)
            }
            MarketType::Spread => matches!(side, PickSide::Home | PickSide::Away),
            MarketType::Total => matches!(side, PickSide::Over | PickSide::Under),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarketType::Moneyline => "moneyline",
            MarketType::Threeway => "threeway",
            MarketType::Spread => "spread",
            MarketType::Total => "total",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moneyline" => Ok(MarketType::Moneyline),
            "threeway" => Ok(MarketType::Threeway),
            "spread" => Ok(MarketType::Spread),
            "total" => Ok(MarketType::Total),
            _ => Err(ValidationError::UnknownMarket(s.to_string())),
        }
    }
}

/// The side a wager picks. Valid combinations depend on the market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum PickSide {
    Home,
    Away,
    Draw,
    Over,
    Under,
}

impl PickSide {
    pub fn as_str(self) -> &'static str {
        match self {
            PickSide::Home => "HOME",
            PickSide::Away => "AWAY",
            PickSide::Draw => "DRAW",
            PickSide::Over => "OVER",
            PickSide::Under => "UNDER",
        }
    }
}

impl fmt::Display for PickSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickSide {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOME" => Ok(PickSide::Home),
            "AWAY" => Ok(PickSide::Away),
            "DRAW" => Ok(PickSide::Draw),
            "OVER" => Ok(PickSide::Over),
            "UNDER" => Ok(PickSide::Under),
            _ => Err(ValidationError::UnknownSide(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for m in [
            MarketType::Moneyline,
            MarketType::Threeway,
            MarketType::Spread,
            MarketType::Total,
        ] {
            assert_eq!(m.to_string().parse::<MarketType>(), Ok(m));
        }
        for s in [
            PickSide::Home,
            PickSide::Away,
            PickSide::Draw,
            PickSide::Over,
            PickSide::Under,
        ] {
            assert_eq!(s.to_string().parse::<PickSide>(), Ok(s));
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Moneyline".parse::<MarketType>().is_err());
        assert!("home".parse::<PickSide>().is_err());
    }

    #[test]
    fn accepted_sides() {
        assert!(MarketType::Moneyline.accepts(PickSide::Draw));
        assert!(MarketType::Threeway.accepts(PickSide::Draw));
        assert!(!MarketType::Spread.accepts(PickSide::Draw));
        assert!(!MarketType::Spread.accepts(PickSide::Over));
        assert!(MarketType::Total.accepts(PickSide::Under));
        assert!(!MarketType::Total.accepts(PickSide::Home));
    }

    #[test]
    fn lines() {
        assert!(!MarketType::Moneyline.has_line());
        assert!(!MarketType::Threeway.has_line());
        assert!(MarketType::Spread.has_line());
        assert!(MarketType::Total.has_line());
    }
}
