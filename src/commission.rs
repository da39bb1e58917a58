//! Runner commission calculation.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::odds::{parse_fixed, round_div};
use crate::types::{Cents, RunnerId, WagerId};
use crate::wager::Wager;

/// How a runner's commission is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CommissionScheme {
    /// Percentage of the book's net win on the wager; zero when the book lost.
    Net,
    /// Percentage of the stake, whatever the result.
    Handle,
}

impl fmt::Display for CommissionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommissionScheme::Net => write!(f, "net"),
            CommissionScheme::Handle => write!(f, "handle"),
        }
    }
}

impl FromStr for CommissionScheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "net" => Ok(CommissionScheme::Net),
            "handle" => Ok(CommissionScheme::Handle),
            _ => Err(ValidationError::UnknownScheme(s.to_string())),
        }
    }
}

/// Commission rate as a percentage in hundredths (basis points).
///
/// `CommissionRate(10_00)` is 10%. Valid range is 0..=100%.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CommissionRate(pub u32);

impl CommissionRate {
    pub const MAX: CommissionRate = CommissionRate(100_00);

    /// `round(amount × rate / 100)`, half up.
    #[inline]
    pub fn apply(self, amount: Cents) -> Cents {
        round_div(amount as i128 * self.0 as i128, 100_00)
    }

    pub fn validate(self) -> Result<Self, ValidationError> {
        if self > Self::MAX {
            return Err(ValidationError::RateOutOfRange(self.to_string()));
        }
        Ok(self)
    }
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for CommissionRate {
    type Err = ValidationError;

    /// Parse a percentage such as `"10"` or `"2.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = parse_fixed(s, 2)?;
        let rate = u32::try_from(raw)
            .map(CommissionRate)
            .map_err(|_| ValidationError::RateOutOfRange(s.to_string()))?;
        rate.validate()
    }
}

/// A runner's commission settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommissionConfig {
    pub scheme: CommissionScheme,
    pub rate: CommissionRate,
}

impl CommissionConfig {
    pub fn net(rate: CommissionRate) -> Self {
        Self {
            scheme: CommissionScheme::Net,
            rate,
        }
    }

    pub fn handle(rate: CommissionRate) -> Self {
        Self {
            scheme: CommissionScheme::Handle,
            rate,
        }
    }

    /// Commission owed on a wager with the given stake and bettor profit.
    ///
    /// ```
    /// use bookline::{CommissionConfig, CommissionRate};
    ///
    /// // Bettor lost 91.00, so the book netted 91.00; 10% of that is 9.10.
    /// assert_eq!(CommissionConfig::net(CommissionRate(10_00)).compute(100_00, -91_00), 9_10);
    /// // Book lost: no commission under the net scheme.
    /// assert_eq!(CommissionConfig::net(CommissionRate(10_00)).compute(100_00, 91_00), 0);
    /// // Handle ignores the result.
    /// assert_eq!(CommissionConfig::handle(CommissionRate(5_00)).compute(200_00, 190_00), 10_00);
    /// ```
    pub fn compute(&self, stake_cents: Cents, profit_cents: Cents) -> Cents {
        match self.scheme {
            CommissionScheme::Handle => self.rate.apply(stake_cents),
            CommissionScheme::Net => {
                let book_net = profit_cents.saturating_neg();
                self.rate.apply(book_net.max(0))
            }
        }
    }
}

/// Commission owed to a runner for one graded wager. At most one per wager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommissionRecord {
    pub wager_id: WagerId,
    pub runner_id: RunnerId,
    pub amount_cents: Cents,
    /// Scheme and rate in force when the record was computed.
    pub scheme: CommissionScheme,
    pub rate: CommissionRate,
}

impl CommissionRecord {
    /// Compute the record for a settled wager. `None` while the wager is open.
    pub fn for_wager(wager: &Wager, config: &CommissionConfig) -> Option<Self> {
        let settlement = wager.settlement()?;
        Some(Self {
            wager_id: wager.id,
            runner_id: wager.runner_id,
            amount_cents: config.compute(wager.stake_cents, settlement.profit_cents),
            scheme: config.scheme,
            rate: config.rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MarketType, PickSide};
    use crate::odds::Odds;
    use crate::types::EventId;
    use crate::wager::{Settlement, WagerResult, WagerStatus};

    #[test]
    fn parse_rate() {
        assert_eq!("10".parse::<CommissionRate>(), Ok(CommissionRate(10_00)));
        assert_eq!("2.5".parse::<CommissionRate>(), Ok(CommissionRate(2_50)));
        assert_eq!("100".parse::<CommissionRate>(), Ok(CommissionRate(100_00)));
        assert!("100.01".parse::<CommissionRate>().is_err());
        assert!("-1".parse::<CommissionRate>().is_err());
    }

    #[test]
    fn rate_display() {
        assert_eq!(CommissionRate(10_00).to_string(), "10.00%");
        assert_eq!(CommissionRate(2_50).to_string(), "2.50%");
    }

    #[test]
    fn parse_scheme() {
        assert_eq!("net".parse::<CommissionScheme>(), Ok(CommissionScheme::Net));
        assert_eq!("handle".parse::<CommissionScheme>(), Ok(CommissionScheme::Handle));
        assert!("gross".parse::<CommissionScheme>().is_err());
    }

    #[test]
    fn net_rounds_half_up() {
        // 10% of 0.05 = 0.005 -> 0.01
        let config = CommissionConfig::net(CommissionRate(10_00));
        assert_eq!(config.compute(10, -5), 1);
        assert_eq!(config.compute(10, -4), 0);
    }

    #[test]
    fn net_push_is_zero() {
        let config = CommissionConfig::net(CommissionRate(50_00));
        assert_eq!(config.compute(100_00, 0), 0);
    }

    #[test]
    fn zero_rate() {
        let config = CommissionConfig::handle(CommissionRate(0));
        assert_eq!(config.compute(100_00, -100_00), 0);
    }

    #[test]
    fn record_requires_settlement() {
        let mut wager = Wager::new(
            WagerId(3),
            EventId(1),
            MarketType::Moneyline,
            PickSide::Home,
            Odds(1_9100),
            100_00,
        )
        .with_runner(RunnerId(8));
        let config = CommissionConfig::net(CommissionRate(10_00));
        assert!(CommissionRecord::for_wager(&wager, &config).is_none());

        wager.status = WagerStatus::Settled(Settlement {
            result: WagerResult::Lose,
            payout_cents: 0,
            profit_cents: -100_00,
            settled_at: 1,
        });
        let record = CommissionRecord::for_wager(&wager, &config).unwrap();
        assert_eq!(record.wager_id, WagerId(3));
        assert_eq!(record.runner_id, RunnerId(8));
        assert_eq!(record.amount_cents, 10_00);
        assert_eq!(record.scheme, CommissionScheme::Net);
        assert_eq!(record.rate, CommissionRate(10_00));
    }
}
