use super::amount::display_decimal;
use super::form::ValidatedData;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Key for a sell quote.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SellQuoteRequest {
    pub iban: String,
    pub currency: String,
    pub amount: Decimal,
    pub asset: String,
}

impl From<&ValidatedData> for SellQuoteRequest {
    fn from(data: &ValidatedData) -> Self {
        Self {
            iban: data.bank_account.iban.clone(),
            currency: data.currency.name.clone(),
            amount: data.amount.value(),
            asset: data.asset.name.clone(),
        }
    }
}

/// Provider estimate for a prospective sell.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Quote {
    /// Expected payout in fiat.
    pub estimated_amount: Decimal,
    /// Fee in percent.
    pub fee: Decimal,
    /// Minimum absolute fee in fiat, zero when none applies.
    pub min_fee_target: Decimal,
    /// Smallest sellable amount of the asset.
    pub min_volume: Decimal,
    pub payment_request: String,
}

/// Display-ready projection of a [`Quote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInformation {
    pub estimated_amount: String,
    pub fee: String,
    pub min_fee: Option<String>,
    pub payment_request: String,
}

impl PaymentInformation {
    pub fn project(quote: &Quote, symbol: &str) -> Self {
        let min_fee = (quote.min_fee_target > Decimal::ZERO)
            .then(|| format!("{} {}", display_decimal(quote.min_fee_target), symbol));

        Self {
            estimated_amount: format!(
                "≈ {} {} (incl. DFX fees)",
                display_decimal(quote.estimated_amount),
                symbol
            ),
            fee: format!("{} %", display_decimal(quote.fee)),
            min_fee,
            payment_request: quote.payment_request.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote() -> Quote {
        Quote {
            estimated_amount: dec!(95),
            fee: dec!(2),
            min_fee_target: dec!(0),
            min_volume: dec!(10),
            payment_request: "pay:xyz".to_string(),
        }
    }

    #[test]
    fn test_project_without_min_fee() {
        let info = PaymentInformation::project(&quote(), "EUR");
        assert_eq!(info.estimated_amount, "≈ 95 EUR (incl. DFX fees)");
        assert_eq!(info.fee, "2 %");
        assert_eq!(info.min_fee, None);
        assert_eq!(info.payment_request, "pay:xyz");
    }

    #[test]
    fn test_project_with_min_fee() {
        let mut quote = quote();
        quote.min_fee_target = dec!(1.50);
        quote.fee = dec!(0.25);
        let info = PaymentInformation::project(&quote, "€");
        assert_eq!(info.min_fee.as_deref(), Some("1.5 €"));
        assert_eq!(info.fee, "0.25 %");
    }
}
