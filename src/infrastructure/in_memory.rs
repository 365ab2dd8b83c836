use crate::domain::bank_account::{BankAccount, BankAccountUpdate};
use crate::domain::currency::Fiat;
use crate::domain::ports::{BankAccountService, CurrencyService, Wallet};
use crate::error::{Result, SellError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A thread-safe in-memory store for bank accounts.
///
/// Uses `Arc<RwLock<BTreeMap<u64, BankAccount>>>` so listings come back in
/// id order. Suited to tests and runs where preferences need not survive.
#[derive(Default, Clone)]
pub struct InMemoryBankAccountStore {
    accounts: Arc<RwLock<BTreeMap<u64, BankAccount>>>,
}

impl InMemoryBankAccountStore {
    /// Creates a new, empty in-memory bank account store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = BankAccount>) -> Self {
        let accounts = accounts.into_iter().map(|a| (a.id, a)).collect();
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }
}

#[async_trait]
impl BankAccountService for InMemoryBankAccountStore {
    async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }

    async fn update_bank_account(&self, id: u64, update: BankAccountUpdate) -> Result<BankAccount> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| SellError::NotFound(format!("bank account {}", id)))?;
        account.apply(&update);
        Ok(account.clone())
    }
}

/// Static list of payout currencies.
#[derive(Default, Clone)]
pub struct CurrencyCatalog {
    currencies: Vec<Fiat>,
}

impl CurrencyCatalog {
    pub fn new(currencies: Vec<Fiat>) -> Self {
        Self { currencies }
    }
}

#[async_trait]
impl CurrencyService for CurrencyCatalog {
    async fn list_currencies(&self) -> Result<Vec<Fiat>> {
        Ok(self.currencies.clone())
    }

    fn describe_currency(&self, currency: &Fiat) -> String {
        match &currency.description {
            Some(description) => format!("{} ({})", currency.name, description),
            None => currency.name.clone(),
        }
    }

    fn symbol_for(&self, currency: &Fiat) -> String {
        currency
            .symbol
            .clone()
            .unwrap_or_else(|| currency.name.clone())
    }
}

/// A wallet that records payment requests instead of broadcasting them.
#[derive(Default, Clone)]
pub struct InMemoryWallet {
    address: Option<String>,
    failure: Option<String>,
    sent: Arc<RwLock<Vec<String>>>,
}

impl InMemoryWallet {
    pub fn new(address: Option<String>) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Makes every `send_payment` call fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub async fn sent_payments(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Wallet for InMemoryWallet {
    fn current_address(&self) -> Option<String> {
        self.address.clone()
    }

    async fn send_payment(&self, payment_request: &str) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(SellError::WalletError(reason.clone()));
        }
        info!(%payment_request, "payment request handed to wallet");
        self.sent.write().await.push(payment_request.to_string());
        Ok(())
    }
}
