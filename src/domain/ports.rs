use super::bank_account::{BankAccount, BankAccountUpdate};
use super::currency::Fiat;
use super::quote::{Quote, SellQuoteRequest};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

#[async_trait]
pub trait BankAccountService: Send + Sync {
    async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>>;
    async fn update_bank_account(&self, id: u64, update: BankAccountUpdate) -> Result<BankAccount>;
}

#[async_trait]
pub trait CurrencyService: Send + Sync {
    async fn list_currencies(&self) -> Result<Vec<Fiat>>;
    fn describe_currency(&self, currency: &Fiat) -> String;
    fn symbol_for(&self, currency: &Fiat) -> String;
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Fails with `SellError::ApiError` when the provider rejects the request.
    async fn fetch_sell_quote(&self, request: &SellQuoteRequest) -> Result<Quote>;
}

pub trait KycPolicy: Send + Sync {
    fn is_eligible_for_sell_amount(&self, amount: Decimal) -> bool;
}

#[async_trait]
pub trait Wallet: Send + Sync {
    fn current_address(&self) -> Option<String>;
    async fn send_payment(&self, payment_request: &str) -> Result<()>;
}

pub type BankAccountServiceHandle = Arc<dyn BankAccountService>;
pub type CurrencyServiceHandle = Arc<dyn CurrencyService>;
pub type QuoteServiceHandle = Arc<dyn QuoteService>;
pub type KycPolicyHandle = Arc<dyn KycPolicy>;
pub type WalletHandle = Arc<dyn Wallet>;

/// The collaborators a sell flow talks to.
#[derive(Clone)]
pub struct SellServices {
    pub bank_accounts: BankAccountServiceHandle,
    pub currencies: CurrencyServiceHandle,
    pub quotes: QuoteServiceHandle,
    pub kyc: KycPolicyHandle,
    pub wallet: WalletHandle,
}
