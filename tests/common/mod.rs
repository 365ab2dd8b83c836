#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sell_flow::application::sell_flow::{FlowSettings, SellFlow};
use sell_flow::domain::bank_account::{BankAccount, BankAccountUpdate};
use sell_flow::domain::currency::{Asset, Fiat};
use sell_flow::domain::ports::{
    BankAccountService, BankAccountServiceHandle, QuoteService, SellServices, Wallet,
    WalletHandle,
};
use sell_flow::domain::quote::{Quote, SellQuoteRequest};
use sell_flow::error::{Result, SellError};
use sell_flow::infrastructure::in_memory::{CurrencyCatalog, InMemoryBankAccountStore, InMemoryWallet};
use sell_flow::infrastructure::tariff::KycLimitPolicy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const IBAN: &str = "DE89370400440532013000";
pub const SECOND_IBAN: &str = "CH9300762011623852957";
pub const WALLET_ADDRESS: &str = "bc1qsellerwallet";

/// Longer than the debounce quiet period.
pub const SETTLE: Duration = Duration::from_millis(600);

#[derive(Clone)]
pub enum StubResponse {
    Quote(Quote),
    Fail(u16, String),
}

/// Quote service double that records requests and replays scripted
/// responses before falling back to a fixed one.
pub struct StubQuoteService {
    fallback: StubResponse,
    scripted: Mutex<VecDeque<(Duration, StubResponse)>>,
    requests: Mutex<Vec<SellQuoteRequest>>,
}

impl StubQuoteService {
    pub fn returning(quote: Quote) -> Self {
        Self::new(StubResponse::Quote(quote))
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::new(StubResponse::Fail(status, message.to_string()))
    }

    fn new(fallback: StubResponse) -> Self {
        Self {
            fallback,
            scripted: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a response served after `delay`, ahead of the fallback.
    pub fn script(self, delay: Duration, response: StubResponse) -> Self {
        self.scripted.lock().unwrap().push_back((delay, response));
        self
    }

    pub fn requests(&self) -> Vec<SellQuoteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteService for StubQuoteService {
    async fn fetch_sell_quote(&self, request: &SellQuoteRequest) -> Result<Quote> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.scripted.lock().unwrap().pop_front();
        let (delay, response) = next.unwrap_or((Duration::ZERO, self.fallback.clone()));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match response {
            StubResponse::Quote(quote) => Ok(quote),
            StubResponse::Fail(status, message) => Err(SellError::api(status, message)),
        }
    }
}

/// Lists accounts normally but rejects every update.
pub struct ReadOnlyBankAccounts(pub Vec<BankAccount>);

#[async_trait]
impl BankAccountService for ReadOnlyBankAccounts {
    async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        Ok(self.0.clone())
    }

    async fn update_bank_account(&self, _id: u64, _update: BankAccountUpdate) -> Result<BankAccount> {
        Err(SellError::api(503, "Account service unavailable"))
    }
}

/// Wallet that takes `delay` to confirm each payment.
pub struct SlowWallet {
    pub delay: Duration,
}

#[async_trait]
impl Wallet for SlowWallet {
    fn current_address(&self) -> Option<String> {
        Some(WALLET_ADDRESS.to_string())
    }

    async fn send_payment(&self, _payment_request: &str) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub fn sample_quote() -> Quote {
    Quote {
        estimated_amount: dec!(95),
        fee: dec!(2),
        min_fee_target: dec!(0),
        min_volume: dec!(10),
        payment_request: "pay:xyz".to_string(),
    }
}

pub fn sample_accounts() -> Vec<BankAccount> {
    vec![
        BankAccount::new(1, IBAN).with_preferred_currency("EUR"),
        BankAccount::new(2, SECOND_IBAN),
    ]
}

pub fn sample_currencies() -> Vec<Fiat> {
    let mut usd = Fiat::new(3, "USD");
    usd.sellable = false;
    vec![Fiat::new(1, "EUR"), Fiat::new(2, "CHF"), usd]
}

pub struct Harness {
    pub flow: SellFlow,
    pub quotes: Arc<StubQuoteService>,
    pub wallet: InMemoryWallet,
    pub bank_accounts: InMemoryBankAccountStore,
}

#[derive(Default)]
pub struct HarnessOptions {
    pub kyc_limit: Option<Decimal>,
    pub wallet: Option<WalletHandle>,
    pub bank_accounts: Option<BankAccountServiceHandle>,
}

pub async fn harness(quotes: StubQuoteService) -> Harness {
    harness_with(quotes, HarnessOptions::default()).await
}

pub async fn harness_with(quotes: StubQuoteService, options: HarnessOptions) -> Harness {
    let quotes = Arc::new(quotes);
    let wallet = InMemoryWallet::new(Some(WALLET_ADDRESS.to_string()));
    let bank_accounts = InMemoryBankAccountStore::with_accounts(sample_accounts());

    let services = SellServices {
        bank_accounts: options
            .bank_accounts
            .unwrap_or_else(|| Arc::new(bank_accounts.clone()) as BankAccountServiceHandle),
        currencies: Arc::new(CurrencyCatalog::new(sample_currencies())),
        quotes: quotes.clone(),
        kyc: Arc::new(KycLimitPolicy::new(options.kyc_limit)),
        wallet: options
            .wallet
            .unwrap_or_else(|| Arc::new(wallet.clone()) as WalletHandle),
    };

    let flow = SellFlow::new(services, FlowSettings::default());
    flow.load().await.unwrap();

    Harness {
        flow,
        quotes,
        wallet,
        bank_accounts,
    }
}

/// Fills the form with account 1 (preferred EUR), BTC and `amount`.
pub async fn fill_form(flow: &SellFlow, amount: &str) {
    flow.change_asset(Asset::new("BTC")).await;
    flow.select_bank_account(1).await.unwrap();
    flow.set_amount(amount).await;
}

/// Lets the debounce fire and any immediate quote resolve.
pub async fn settle() {
    tokio::time::sleep(SETTLE).await;
}
