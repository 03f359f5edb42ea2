//! Amount type for representing journal amounts
//!
//! Wraps `rust_decimal::Decimal` so comparisons are exact. Withdrawals are
//! stored negative and deposits positive; rule triggers compare magnitudes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A monetary amount with exact decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250.00", "10"
    pub fn parse(s: &str) -> Result<Self, AmountParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(AmountParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| AmountParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error type for amount parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    InvalidFormat(String),
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountParseError::InvalidFormat(s) => write!(f, "Invalid amount format: {}", s),
        }
    }
}

impl std::error::Error for AmountParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse("10.50").unwrap().to_string(), "10.50");
        assert_eq!(Amount::parse("$10.50").unwrap().to_string(), "10.50");
        assert_eq!(Amount::parse("-10.5").unwrap().to_string(), "-10.50");
        assert_eq!(Amount::parse("1,250").unwrap().to_string(), "1250.00");
        assert!(Amount::parse("ten").is_err());
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("-").is_err());
    }

    #[test]
    fn test_exact_comparison() {
        let a = Amount::parse("0.1").unwrap().as_decimal() + Amount::parse("0.2").unwrap().as_decimal();
        assert_eq!(Amount::from(a), Amount::parse("0.3").unwrap());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Amount::parse("-15.00").unwrap().is_negative());
        assert!(Amount::parse("15").unwrap().is_positive());
        assert!(Amount::zero().is_zero());
        assert!(!Amount::zero().is_negative());
        assert_eq!(Amount::parse("-15.00").unwrap().abs(), Amount::parse("15").unwrap());
    }

    #[test]
    fn test_serialized_as_string() {
        let amount = Amount::parse("-15.00").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"-15.00\"");

        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(amount, back);
    }
}
