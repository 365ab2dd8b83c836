use crate::error::SellError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strictly positive quantity of the asset being sold.
///
/// Wraps `rust_decimal::Decimal` so an amount that made it through form
/// validation can never be zero, negative or non-numeric.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SellError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SellError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    /// Parses user input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, SellError> {
        let trimmed = input.trim();
        let value = Decimal::from_str(trimmed).map_err(|_| {
            SellError::ValidationError(format!("'{}' is not a number", trimmed))
        })?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SellError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_decimal(self.0))
    }
}

/// Renders a decimal without trailing zeros (`95.00` becomes `95`).
pub fn display_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(SellError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(SellError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_parse() {
        assert_eq!(Amount::parse(" 100 ").unwrap().value(), dec!(100));
        assert_eq!(Amount::parse("0.5").unwrap().value(), dec!(0.5));
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("abc").is_err());
        assert!(Amount::parse("0").is_err());
        assert!(Amount::parse("-3").is_err());
    }

    #[test]
    fn test_display_decimal_normalizes() {
        assert_eq!(display_decimal(dec!(95.00)), "95");
        assert_eq!(display_decimal(dec!(0.0150)), "0.015");
        assert_eq!(Amount::new(dec!(200.0)).unwrap().to_string(), "200");
    }
}
