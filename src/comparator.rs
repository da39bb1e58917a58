//! Outcome comparator: grades one leg of a wager against a final score.

use std::cmp::Ordering;
use std::fmt;

use crate::error::SettleError;
use crate::market::{MarketType, PickSide};
use crate::odds::Line;

/// Final (or hypothetical) score of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Combined points, in line hundredths.
    fn total_hundredths(self) -> i64 {
        (self.home as i64 + self.away as i64) * Line::SCALE
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Ternary result of a leg, from the bettor's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Win,
    Push,
    Lose,
}

impl Comparison {
    /// `Greater` means the bettor's side came out ahead.
    #[inline]
    pub fn from_ordering(ord: Ordering) -> Self {
        match ord {
            Ordering::Greater => Comparison::Win,
            Ordering::Equal => Comparison::Push,
            Ordering::Less => Comparison::Lose,
        }
    }

    /// +1, 0 or −1.
    #[inline]
    pub fn signum(self) -> i8 {
        match self {
            Comparison::Win => 1,
            Comparison::Push => 0,
            Comparison::Lose => -1,
        }
    }
}

/// Grade one leg.
///
/// `line` is ignored for moneyline and three-way markets and required for
/// spread and total markets.
///
/// Moneyline and three-way picks have no push state: the pick either matches
/// the winner (`DRAW` when level) or loses.
///
/// ```
/// use bookline::{compare, Comparison, Line, MarketType, PickSide, Score};
///
/// let cmp = compare(MarketType::Spread, PickSide::Home, Score::new(24, 21), Some(Line(-3_00)));
/// assert_eq!(cmp, Ok(Comparison::Push));
/// ```
pub fn compare(
    market: MarketType,
    side: PickSide,
    score: Score,
    line: Option<Line>,
) -> Result<Comparison, SettleError> {
    if !market.accepts(side) {
        return Err(SettleError::InvalidMarket { market, side });
    }

    match market {
        MarketType::Moneyline | MarketType::Threeway => {
            let winner = score.home.cmp(&score.away);
            let picked = match side {
                PickSide::Home => Ordering::Greater,
                PickSide::Away => Ordering::Less,
                PickSide::Draw => Ordering::Equal,
                PickSide::Over | PickSide::Under => {
                    return Err(SettleError::InvalidMarket { market, side });
                }
            };
            Ok(if winner == picked {
                Comparison::Win
            } else {
                Comparison::Lose
            })
        }
        MarketType::Spread => {
            let line = line.ok_or(SettleError::MissingLine(market))?.hundredths();
            let home = score.home as i64 * Line::SCALE;
            let away = score.away as i64 * Line::SCALE;
            let (own, opponent) = match side {
                PickSide::Home => (home, away),
                PickSide::Away => (away, home),
                PickSide::Draw | PickSide::Over | PickSide::Under => {
                    return Err(SettleError::InvalidMarket { market, side });
                }
            };
            Ok(Comparison::from_ordering((own + line).cmp(&opponent)))
        }
        MarketType::Total => {
            let line = line.ok_or(SettleError::MissingLine(market))?.hundredths();
            let total = score.total_hundredths();
            match side {
                PickSide::Over => Ok(Comparison::from_ordering(total.cmp(&line))),
                PickSide::Under => Ok(Comparison::from_ordering(line.cmp(&total))),
                PickSide::Home | PickSide::Away | PickSide::Draw => {
                    Err(SettleError::InvalidMarket { market, side })
                }
            }
        }
    }
}
