use super::quote_refresher::{DEFAULT_DEBOUNCE, QuoteRefresher, RefreshOutcome, spawn_debounced};
use super::state::{FlowState, SellFlowView};
use super::submission::SubmissionController;
use crate::domain::bank_account::BankAccount;
use crate::domain::currency::{Asset, Fiat};
use crate::domain::form::{FormData, FormState};
use crate::domain::phase::{ScreenPhase, SubmitOutcome, SubmitReadiness};
use crate::domain::ports::{BankAccountServiceHandle, CurrencyServiceHandle, SellServices};
use crate::error::{Result, SellError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runtime knobs for a [`SellFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub debounce: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// The sell screen as a headless controller.
///
/// `SellFlow` owns the form, keeps a quote in sync with it through a
/// debounced background task, and runs the submission lifecycle. Renderers
/// read [`SellFlowView`] snapshots and call the mutation methods in response
/// to user input.
pub struct SellFlow {
    form: FormState,
    state: Arc<RwLock<FlowState>>,
    refresher: Arc<QuoteRefresher>,
    submission: SubmissionController,
    bank_account_service: BankAccountServiceHandle,
    currency_service: CurrencyServiceHandle,
    bank_accounts: Arc<RwLock<Vec<BankAccount>>>,
    currencies: RwLock<Vec<Fiat>>,
    debounce_task: JoinHandle<()>,
}

impl SellFlow {
    /// Creates a flow and starts its debounce task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(services: SellServices, settings: FlowSettings) -> Self {
        let form = FormState::new();
        let state = Arc::new(RwLock::new(FlowState::default()));
        let bank_accounts = Arc::new(RwLock::new(Vec::new()));

        let refresher = Arc::new(QuoteRefresher::new(&services, state.clone()));
        let submission = SubmissionController::new(&services, state.clone(), bank_accounts.clone());
        let debounce_task = spawn_debounced(refresher.clone(), form.subscribe(), settings.debounce);

        Self {
            form,
            state,
            refresher,
            submission,
            bank_account_service: services.bank_accounts,
            currency_service: services.currencies,
            bank_accounts,
            currencies: RwLock::new(Vec::new()),
            debounce_task,
        }
    }

    /// Fetches the bank accounts and currencies offered in the pickers.
    pub async fn load(&self) -> Result<()> {
        let accounts = self.bank_account_service.list_bank_accounts().await?;
        let currencies = self.currency_service.list_currencies().await?;
        debug!(
            accounts = accounts.len(),
            currencies = currencies.len(),
            "sell flow catalog loaded"
        );
        *self.bank_accounts.write().await = accounts;
        *self.currencies.write().await = currencies;
        Ok(())
    }

    pub async fn bank_accounts(&self) -> Vec<BankAccount> {
        self.bank_accounts.read().await.clone()
    }

    /// Currencies the user may sell into.
    pub async fn currencies(&self) -> Vec<Fiat> {
        self.currencies
            .read()
            .await
            .iter()
            .filter(|c| c.sellable)
            .cloned()
            .collect()
    }

    /// Sellable currencies paired with their picker labels.
    pub async fn currency_options(&self) -> Vec<(Fiat, String)> {
        self.currencies()
            .await
            .into_iter()
            .map(|c| {
                let label = self.currency_service.describe_currency(&c);
                (c, label)
            })
            .collect()
    }

    pub fn describe_currency(&self, currency: &Fiat) -> String {
        self.currency_service.describe_currency(currency)
    }

    /// Selects a bank account. When the selection changes and the account has
    /// a preferred currency, that currency is filled in as well.
    pub async fn select_bank_account(&self, id: u64) -> Result<()> {
        let account = self
            .bank_accounts
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| SellError::NotFound(format!("bank account {}", id)))?;

        let changed = self.form.snapshot().bank_account.map(|a| a.id) != Some(id);
        let preferred = account.preferred_currency.clone();
        self.form.set_bank_account(account);

        if changed && let Some(code) = preferred {
            match self.find_currency(&code).await {
                Some(currency) => self.form.set_currency(currency),
                None => debug!(%code, "preferred currency is not sellable"),
            }
        }
        Ok(())
    }

    /// Selects a currency by code.
    pub async fn select_currency(&self, code: &str) -> Result<()> {
        let currency = self
            .find_currency(code)
            .await
            .ok_or_else(|| SellError::NotFound(format!("currency {}", code)))?;
        self.form.set_currency(currency);
        Ok(())
    }

    async fn find_currency(&self, code: &str) -> Option<Fiat> {
        self.currencies
            .read()
            .await
            .iter()
            .find(|c| c.sellable && c.name.eq_ignore_ascii_case(code))
            .cloned()
    }

    pub async fn set_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        let empty = amount.is_empty();
        self.form.set_amount(amount);
        if empty {
            self.state.write().await.clear_amount_feedback();
        }
    }

    /// Reacts to the asset being switched from outside the screen.
    ///
    /// The amount is cleared, the phase returns to `Entering` and any quote or
    /// submission still in flight is disowned.
    pub async fn change_asset(&self, asset: Asset) {
        if self.form.snapshot().asset.as_ref() == Some(&asset) {
            return;
        }
        debug!(asset = %asset.name, "asset changed");

        self.refresher.invalidate();
        self.form.reset_for_asset(asset);

        let mut state = self.state.write().await;
        state.phase = ScreenPhase::Entering;
        state.submission_epoch += 1;
        state.loading = false;
        state.payment_information = None;
        state.quoted_request = None;
        state.failure = None;
        state.clear_amount_feedback();
    }

    pub fn form(&self) -> FormData {
        self.form.snapshot()
    }

    pub async fn view(&self) -> SellFlowView {
        let state = self.state.read().await;
        SellFlowView::new(self.form.snapshot(), &state)
    }

    /// Requests a quote for the current form right away, skipping the
    /// debounce.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let generation = self.refresher.begin();
        self.refresher.refresh(generation, self.form.snapshot()).await
    }

    pub async fn readiness(&self) -> SubmitReadiness {
        let state = self.state.read().await;
        self.submission.readiness(&self.form.snapshot(), &state)
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.submission.submit(&self.form.snapshot()).await
    }
}

impl Drop for SellFlow {
    fn drop(&mut self) {
        self.debounce_task.abort();
    }
}
