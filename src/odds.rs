//! Fixed-point decimal odds and lines, and the rounding rule shared by all
//! money computations.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Cents;

/// Decimal odds in ten-thousandths, stake included.
///
/// `Odds(1_9100)` is a decimal price of 1.91: a winning stake of 100.00 pays 191.00.
/// Four fractional digits match the precision prices are quoted with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Odds(pub u32);

impl Odds {
    /// Fixed-point scale: 1.0 == `Odds(10_000)`.
    pub const SCALE: u32 = 10_000;
    pub const ONE: Odds = Odds(1_0000);
    pub const EVENS: Odds = Odds(2_0000);

    /// A usable wager price: strictly greater than 1.0.
    #[inline]
    pub fn is_valid(self) -> bool {
        self > Odds::ONE
    }

    /// Gross return on a winning stake: `round(stake × price)`.
    ///
    /// ```
    /// use bookline::Odds;
    ///
    /// assert_eq!(Odds(1_9100).payout(100_00), 191_00);
    /// assert_eq!(Odds(1_9125).payout(1), 2); // 1.9125 rounds half up
    /// ```
    #[inline]
    pub fn payout(self, stake: Cents) -> Cents {
        round_div(stake as i128 * self.0 as i128, Self::SCALE as i128)
    }

    /// Net winnings on a winning stake: `round(stake × (price − 1))`.
    #[inline]
    pub fn net_winnings(self, stake: Cents) -> Cents {
        let net = self.0 as i128 - Self::SCALE as i128;
        round_div(stake as i128 * net, Self::SCALE as i128)
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.0 as i64, 4, 2)
    }
}

impl FromStr for Odds {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = parse_fixed(s, 4)?;
        u32::try_from(raw)
            .map(Odds)
            .map_err(|_| ValidationError::InvalidDecimal(s.to_string()))
    }
}

/// A handicap or total line in hundredths.
///
/// `Line(-3_25)` is −3.25 and `Line(44_50)` is 44.50.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Line(pub i32);

impl Line {
    pub const SCALE: i64 = 100;
    pub const ZERO: Line = Line(0);

    /// Whether the line has a non-zero fractional part (e.g., 0.25, 0.5, 0.75).
    #[inline]
    pub fn is_fractional(self) -> bool {
        self.0 % 100 != 0
    }

    /// The line in hundredths, widened for score arithmetic.
    #[inline]
    pub fn hundredths(self) -> i64 {
        self.0 as i64
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.0 as i64, 2, 2)
    }
}

impl FromStr for Line {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = parse_fixed(s, 2)?;
        i32::try_from(raw)
            .map(Line)
            .map_err(|_| ValidationError::InvalidDecimal(s.to_string()))
    }
}

/// `n / d` rounded half up (toward positive infinity on ties), saturated into `i64`.
///
/// All monetary rounding goes through this function so that the result never
/// depends on evaluation order.
pub(crate) fn round_div(n: i128, d: i128) -> i64 {
    debug_assert!(d > 0);
    let q = (n + d / 2).div_euclid(d);
    i64::try_from(q).unwrap_or(if q < 0 { i64::MIN } else { i64::MAX })
}

/// Parse a decimal string into a fixed-point integer with `digits` fractional digits.
///
/// Trailing zeros beyond the precision are accepted; significant digits are not.
pub(crate) fn parse_fixed(s: &str, digits: u32) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidDecimal(s.to_string());
    let text = s.trim();
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let significant = frac_part.trim_end_matches('0');
    if significant.len() > digits as usize {
        return Err(ValidationError::Precision {
            value: s.to_string(),
            max: digits,
        });
    }

    let int_value: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let mut frac_value = 0_i64;
    for (i, b) in significant.bytes().enumerate() {
        frac_value += i64::from(b - b'0') * 10_i64.pow(digits - 1 - i as u32);
    }

    let value = int_value
        .checked_mul(10_i64.pow(digits))
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(invalid)?;
    Ok(if negative { -value } else { value })
}

/// Write a fixed-point value, keeping at least `min_frac` fractional digits.
fn write_fixed(f: &mut fmt::Formatter<'_>, value: i64, digits: u32, min_frac: usize) -> fmt::Result {
    let scale = 10_u64.pow(digits);
    let abs = value.unsigned_abs();
    let mut frac = format!("{:0width$}", abs % scale, width = digits as usize);
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }
    let sign = if value < 0 { "-" } else { "" };
    write!(f, "{sign}{}.{frac}", abs / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_odds() {
        assert_eq!("1.91".parse::<Odds>(), Ok(Odds(1_9100)));
        assert_eq!("2".parse::<Odds>(), Ok(Odds(2_0000)));
        assert_eq!("1.9125".parse::<Odds>(), Ok(Odds(1_9125)));
        assert_eq!("1.912500".parse::<Odds>(), Ok(Odds(1_9125)));
        assert!("1.91251".parse::<Odds>().is_err());
        assert!("-1.5".parse::<Odds>().is_err());
        assert!("abc".parse::<Odds>().is_err());
        assert!(".".parse::<Odds>().is_err());
    }

    #[test]
    fn parse_lines() {
        assert_eq!("-3".parse::<Line>(), Ok(Line(-3_00)));
        assert_eq!("-3.25".parse::<Line>(), Ok(Line(-3_25)));
        assert_eq!("+0.5".parse::<Line>(), Ok(Line(50)));
        assert_eq!("44.5".parse::<Line>(), Ok(Line(44_50)));
        assert_eq!("-.75".parse::<Line>(), Ok(Line(-75)));
        assert!("1.125".parse::<Line>().is_err());
        assert!("".parse::<Line>().is_err());
        assert!("1-2".parse::<Line>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Odds(1_9100).to_string(), "1.91");
        assert_eq!(Odds(2_0000).to_string(), "2.00");
        assert_eq!(Odds(1_9125).to_string(), "1.9125");
        assert_eq!(Line(-3_25).to_string(), "-3.25");
        assert_eq!(Line(44_50).to_string(), "44.50");
        assert_eq!(Line(-50).to_string(), "-0.50");
    }

    #[test]
    fn fractional_lines() {
        assert!(!Line(-3_00).is_fractional());
        assert!(!Line(0).is_fractional());
        assert!(Line(-3_25).is_fractional());
        assert!(Line(44_50).is_fractional());
        assert!(Line(-75).is_fractional());
    }

    #[test]
    fn validity() {
        assert!(!Odds::ONE.is_valid());
        assert!(Odds(1_0001).is_valid());
        assert!(!Odds(0).is_valid());
    }

    #[test]
    fn payout_rounds_half_up() {
        assert_eq!(Odds(1_9100).payout(100_00), 191_00);
        assert_eq!(Odds(1_5000).payout(1), 2); // 1.5 -> 2
        assert_eq!(Odds(1_4999).payout(1), 1);
        assert_eq!(Odds(2_1000).net_winnings(50_00), 55_00);
        assert_eq!(Odds(1_9100).net_winnings(100_00), 91_00);
    }

    #[test]
    fn round_div_ties_go_up() {
        assert_eq!(round_div(5, 10), 1);
        assert_eq!(round_div(4, 10), 0);
        assert_eq!(round_div(-5, 10), 0);
        assert_eq!(round_div(-6, 10), -1);
    }

    #[test]
    fn round_div_saturates() {
        assert_eq!(round_div(i128::MAX / 2, 1), i64::MAX);
        assert_eq!(round_div(i128::MIN / 2, 1), i64::MIN);
    }
}
