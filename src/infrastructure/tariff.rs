use crate::config::Tariff;
use crate::domain::amount::display_decimal;
use crate::domain::ports::{KycPolicy, QuoteService};
use crate::domain::quote::{Quote, SellQuoteRequest};
use crate::error::{IDENT_INCOMPLETE_MESSAGE, IDENT_INCOMPLETE_STATUS, Result, SellError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

/// Offline quote provider computing payouts from configured tariffs.
#[derive(Debug, Default, Clone)]
pub struct TariffQuoteService {
    tariffs: Vec<Tariff>,
    ident_incomplete: HashSet<String>,
}

impl TariffQuoteService {
    pub fn new(tariffs: Vec<Tariff>) -> Self {
        Self {
            tariffs,
            ident_incomplete: HashSet::new(),
        }
    }

    /// Rejects quotes for these IBANs as if identification were missing.
    pub fn with_ident_incomplete(mut self, ibans: impl IntoIterator<Item = String>) -> Self {
        self.ident_incomplete.extend(ibans);
        self
    }

    fn tariff(&self, asset: &str, currency: &str) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| {
            t.asset.eq_ignore_ascii_case(asset) && t.currency.eq_ignore_ascii_case(currency)
        })
    }
}

/// Prices `amount` under `tariff`. The fee is the percentage share of the
/// gross payout, raised to `min_fee` when that is higher.
///
/// Amounts whose payout does not fit a `Decimal` are rejected with status 400.
pub fn price_sell(tariff: &Tariff, amount: Decimal) -> Result<Quote> {
    let overflow = || SellError::api(400, format!("Amount {} is too large", display_decimal(amount)));

    let gross = amount.checked_mul(tariff.price).ok_or_else(overflow)?;
    let fee_amount = gross
        .checked_mul(tariff.fee_percent)
        .and_then(|fee| fee.checked_div(dec!(100)))
        .ok_or_else(overflow)?
        .max(tariff.min_fee);
    let estimated = gross
        .checked_sub(fee_amount)
        .ok_or_else(overflow)?
        .max(Decimal::ZERO)
        .round_dp(2);

    Ok(Quote {
        estimated_amount: estimated,
        fee: tariff.fee_percent,
        min_fee_target: tariff.min_fee,
        min_volume: tariff.min_volume,
        payment_request: format!("{}?amount={}", tariff.deposit_uri, display_decimal(amount)),
    })
}

#[async_trait]
impl QuoteService for TariffQuoteService {
    async fn fetch_sell_quote(&self, request: &SellQuoteRequest) -> Result<Quote> {
        if self.ident_incomplete.contains(&request.iban) {
            return Err(SellError::api(IDENT_INCOMPLETE_STATUS, IDENT_INCOMPLETE_MESSAGE));
        }
        let tariff = self.tariff(&request.asset, &request.currency).ok_or_else(|| {
            SellError::api(
                404,
                format!("No sell tariff for {}/{}", request.asset, request.currency),
            )
        })?;
        price_sell(tariff, request.amount)
    }
}

/// Allows sells whose payout stays at or below a fixed limit.
#[derive(Debug, Default, Clone, Copy)]
pub struct KycLimitPolicy {
    limit: Option<Decimal>,
}

impl KycLimitPolicy {
    /// `None` means no limit.
    pub fn new(limit: Option<Decimal>) -> Self {
        Self { limit }
    }
}

impl KycPolicy for KycLimitPolicy {
    fn is_eligible_for_sell_amount(&self, amount: Decimal) -> bool {
        self.limit.is_none_or(|limit| amount <= limit)
    }
}
