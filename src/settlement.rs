//! Leg settlement: payout and profit for a single graded leg.

use crate::comparator::Comparison;
use crate::odds::Odds;
use crate::types::Cents;

/// Money outcome of one leg (or the sum of a wager's legs).
///
/// `profit` is the bettor's: positive when the bettor wins money.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegResult {
    pub payout_cents: Cents,
    pub profit_cents: Cents,
}

impl LegResult {
    /// Sum two legs.
    #[inline]
    pub fn combine(self, other: LegResult) -> LegResult {
        LegResult {
            payout_cents: self.payout_cents.saturating_add(other.payout_cents),
            profit_cents: self.profit_cents.saturating_add(other.profit_cents),
        }
    }
}

/// Settle one leg of `stake` at `odds`.
///
/// - win: payout = round(stake × price), profit = payout − stake
/// - push: payout = stake, profit = 0
/// - lose: payout = 0, profit = −stake
///
/// ```
/// use bookline::{settle_leg, Comparison, Odds};
///
/// let leg = settle_leg(100_00, Odds(1_9100), Comparison::Win);
/// assert_eq!(leg.payout_cents, 191_00);
/// assert_eq!(leg.profit_cents, 91_00);
/// ```
pub fn settle_leg(stake: Cents, odds: Odds, cmp: Comparison) -> LegResult {
    match cmp {
        Comparison::Win => {
            let payout = odds.payout(stake);
            LegResult {
                payout_cents: payout,
                profit_cents: payout - stake,
            }
        }
        Comparison::Push => LegResult {
            payout_cents: stake,
            profit_cents: 0,
        },
        Comparison::Lose => LegResult {
            payout_cents: 0,
            profit_cents: -stake,
        },
    }
}
