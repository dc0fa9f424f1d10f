//! Membership fee: a non-negative decimal with at most four fractional digits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FRACTION_DIGITS: u32 = 4;
const UNITS_PER_WHOLE: i64 = 10_000;

/// Stored in the `Fee` column as ten-thousandths of a currency unit.
/// Constructors keep that count within `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fee(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeParseError {
    #[error("is required")]
    Empty,

    #[error("must not be negative")]
    Negative,

    #[error("is not a valid amount")]
    Malformed,

    #[error("allows at most {} decimal places", FRACTION_DIGITS)]
    TooPrecise,

    #[error("is too large")]
    Overflow,
}

impl Fee {
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::new(units, FRACTION_DIGITS))
    }

    /// Raw ten-thousandths, as stored in the `Fee` column.
    pub fn units(&self) -> i64 {
        let mut d = self.0;
        d.rescale(FRACTION_DIGITS);
        d.mantissa() as i64
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    fn from_decimal(d: Decimal) -> Result<Self, FeeParseError> {
        if d.is_sign_negative() && !d.is_zero() {
            return Err(FeeParseError::Negative);
        }
        if d.normalize().scale() > FRACTION_DIGITS {
            return Err(FeeParseError::TooPrecise);
        }
        d.checked_mul(Decimal::from(UNITS_PER_WHOLE))
            .and_then(|units| units.to_i64())
            .ok_or(FeeParseError::Overflow)?;
        Ok(Self(d.normalize()))
    }
}

impl FromStr for Fee {
    type Err = FeeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FeeParseError::Empty);
        }
        let parsed = if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)
        } else {
            Decimal::from_str_exact(s)
        };
        parsed
            .map_err(|_| FeeParseError::Malformed)
            .and_then(Self::from_decimal)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = self.0;
        d.rescale(FRACTION_DIGITS);
        write!(f, "{}", d)
    }
}

impl Serialize for Fee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fee as submitted by a client: either a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeeInput {
    Text(String),
    Number(serde_json::Number),
}

impl FeeInput {
    pub fn parse(&self) -> Result<Fee, FeeParseError> {
        match self {
            Self::Text(s) => s.parse(),
            // Numbers may print in exponent form ("1e-5"); `Fee::from_str` handles both.
            Self::Number(n) => n.to_string().parse(),
        }
    }
}

impl From<&str> for FeeInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_to_units() {
        assert_eq!("12".parse::<Fee>().unwrap().units(), 120_000);
        assert_eq!("12.5".parse::<Fee>().unwrap().units(), 125_000);
        assert_eq!("0.0001".parse::<Fee>().unwrap().units(), 1);
        assert_eq!(" 3.05 ".parse::<Fee>().unwrap().units(), 30_500);
        assert_eq!("1e3".parse::<Fee>().unwrap().units(), 10_000_000);
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        assert_eq!("1.500000".parse::<Fee>().unwrap().units(), 15_000);
    }

    #[test]
    fn display_has_four_places() {
        assert_eq!(Fee::from_units(125_000).to_string(), "12.5000");
        assert_eq!(Fee::from_units(1).to_string(), "0.0001");
        assert_eq!(Fee::default().to_string(), "0.0000");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Fee>(), Err(FeeParseError::Empty));
        assert_eq!("-1".parse::<Fee>(), Err(FeeParseError::Negative));
        assert_eq!("1.2.3".parse::<Fee>(), Err(FeeParseError::Malformed));
        assert_eq!("abc".parse::<Fee>(), Err(FeeParseError::Malformed));
        assert_eq!("1.23456".parse::<Fee>(), Err(FeeParseError::TooPrecise));
        assert_eq!(
            "99999999999999999999".parse::<Fee>(),
            Err(FeeParseError::Overflow)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FeeParseError::TooPrecise.to_string(),
            "allows at most 4 decimal places"
        );
        assert_eq!(FeeParseError::Negative.to_string(), "must not be negative");
    }

    #[test]
    fn json_number_input() {
        let input: FeeInput = serde_json::from_str("19.99").unwrap();
        assert_eq!(input.parse().unwrap().units(), 199_900);
        let input: FeeInput = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(input.parse().unwrap().to_string(), "7.0000");
    }

    #[test]
    fn json_exponent_number_is_a_precision_error() {
        let input: FeeInput = serde_json::from_str("1e-5").unwrap();
        assert_eq!(input.parse(), Err(FeeParseError::TooPrecise));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Fee::from_units(50_000)).unwrap();
        assert_eq!(json, "\"5.0000\"");
    }
}
