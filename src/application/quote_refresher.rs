use super::state::FlowState;
use crate::domain::amount::display_decimal;
use crate::domain::form::{FormData, ValidatedData};
use crate::domain::phase::FlowFailure;
use crate::domain::ports::{CurrencyServiceHandle, KycPolicy, KycPolicyHandle, QuoteServiceHandle, SellServices};
use crate::domain::quote::{PaymentInformation, Quote, SellQuoteRequest};
use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet period after the last form change before a quote is requested.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// How a quote response maps onto the sell rules.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteAssessment {
    BelowMinimum { message: String },
    Accepted {
        payment_information: PaymentInformation,
        kyc_required: bool,
    },
    IdentIncomplete,
    Unavailable(String),
}

/// Applies the minimum-deposit and KYC rules to a quote response.
pub fn assess_quote(
    validated: &ValidatedData,
    response: Result<Quote>,
    kyc: &dyn KycPolicy,
    symbol: &str,
) -> QuoteAssessment {
    let quote = match response {
        Ok(quote) => quote,
        Err(e) if e.is_ident_incomplete() => return QuoteAssessment::IdentIncomplete,
        Err(e) => return QuoteAssessment::Unavailable(e.to_string()),
    };

    if quote.min_volume > validated.amount.value() {
        return QuoteAssessment::BelowMinimum {
            message: format!(
                "Entered amount is below minimum deposit of {} {}",
                display_decimal(quote.min_volume),
                validated.asset.name
            ),
        };
    }

    QuoteAssessment::Accepted {
        kyc_required: !kyc.is_eligible_for_sell_amount(quote.estimated_amount),
        payment_information: PaymentInformation::project(&quote, symbol),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The form was not complete; no request was made.
    Incomplete,
    Applied,
    /// A newer trigger superseded this one; its result was dropped.
    Stale,
}

/// Keeps `FlowState::payment_information` in sync with the form.
///
/// Every trigger takes a generation number. Results are written back only
/// while their generation is still the latest one, so a slow response can
/// never overwrite a newer quote.
pub struct QuoteRefresher {
    quotes: QuoteServiceHandle,
    kyc: KycPolicyHandle,
    currencies: CurrencyServiceHandle,
    state: Arc<RwLock<FlowState>>,
    generation: AtomicU64,
}

impl QuoteRefresher {
    pub fn new(services: &SellServices, state: Arc<RwLock<FlowState>>) -> Self {
        Self {
            quotes: services.quotes.clone(),
            kyc: services.kyc.clone(),
            currencies: services.currencies.clone(),
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Starts a new generation and returns its number.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Marks every outstanding refresh as stale.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn refresh(&self, generation: u64, form: FormData) -> RefreshOutcome {
        let Some(validated) = form.validate() else {
            if !self.is_current(generation) {
                return RefreshOutcome::Stale;
            }
            let mut state = self.state.write().await;
            state.payment_information = None;
            state.quoted_request = None;
            state.loading = false;
            clear_quote_failure(&mut state);
            return RefreshOutcome::Incomplete;
        };

        if !self.is_current(generation) {
            return RefreshOutcome::Stale;
        }
        self.state.write().await.loading = true;

        let request = SellQuoteRequest::from(&validated);
        debug!(generation, asset = %request.asset, currency = %request.currency, amount = %request.amount, "requesting sell quote");
        let response = self.quotes.fetch_sell_quote(&request).await;

        let symbol = self.currencies.symbol_for(&validated.currency);
        let assessment = assess_quote(&validated, response, self.kyc.as_ref(), &symbol);

        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            debug!(generation, "discarding stale quote");
            return RefreshOutcome::Stale;
        }
        apply_assessment(&mut state, assessment);
        state.quoted_request = Some(request);
        state.loading = false;
        RefreshOutcome::Applied
    }
}

fn clear_quote_failure(state: &mut FlowState) {
    if matches!(state.failure, Some(FlowFailure::QuoteUnavailable(_))) {
        state.failure = None;
    }
}

fn apply_assessment(state: &mut FlowState, assessment: QuoteAssessment) {
    clear_quote_failure(state);
    match assessment {
        QuoteAssessment::BelowMinimum { message } => {
            state.payment_information = None;
            state.amount_error = Some(message);
        }
        QuoteAssessment::Accepted {
            payment_information,
            kyc_required,
        } => {
            state.amount_error = None;
            state.kyc_required = kyc_required;
            state.payment_information = Some(payment_information);
        }
        QuoteAssessment::IdentIncomplete => {
            state.payment_information = None;
            state.amount_error = None;
            state.kyc_required = true;
        }
        QuoteAssessment::Unavailable(reason) => {
            warn!(%reason, "sell quote unavailable");
            state.payment_information = None;
            state.amount_error = None;
            state.failure = Some(FlowFailure::QuoteUnavailable(reason));
        }
    }
}

/// Runs the refresher whenever the form has been quiet for `quiet`.
///
/// Each refresh is spawned on its own so a slow provider does not hold back
/// later triggers. The loop ends when the form sender is dropped.
pub fn spawn_debounced(
    refresher: Arc<QuoteRefresher>,
    mut changes: watch::Receiver<FormData>,
    quiet: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    _ = tokio::time::sleep(quiet) => break,
                }
            }

            let form = changes.borrow_and_update().clone();
            let generation = refresher.begin();
            let refresher = refresher.clone();
            tokio::spawn(async move {
                refresher.refresh(generation, form).await;
            });
        }
    })
}
