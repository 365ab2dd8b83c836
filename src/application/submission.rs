use super::state::FlowState;
use crate::domain::bank_account::{BankAccount, BankAccountUpdate};
use crate::domain::form::FormData;
use crate::domain::phase::{
    BlockReason, FlowFailure, ScreenPhase, SubmitOutcome, SubmitPlan, SubmitReadiness,
};
use crate::domain::ports::{BankAccountServiceHandle, SellServices, WalletHandle};
use crate::domain::quote::SellQuoteRequest;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Drives the Entering -> Completing -> Completed lifecycle.
pub struct SubmissionController {
    bank_account_service: BankAccountServiceHandle,
    wallet: WalletHandle,
    state: Arc<RwLock<FlowState>>,
    bank_accounts: Arc<RwLock<Vec<BankAccount>>>,
}

impl SubmissionController {
    /// # Arguments
    ///
    /// * `services` - Provides the bank account service and the wallet.
    /// * `state` - Flow state shared with the quote refresher.
    /// * `bank_accounts` - Loaded accounts, refreshed after a preference update.
    pub fn new(
        services: &SellServices,
        state: Arc<RwLock<FlowState>>,
        bank_accounts: Arc<RwLock<Vec<BankAccount>>>,
    ) -> Self {
        Self {
            bank_account_service: services.bank_accounts.clone(),
            wallet: services.wallet.clone(),
            state,
            bank_accounts,
        }
    }

    pub fn readiness(&self, form: &FormData, state: &FlowState) -> SubmitReadiness {
        if state.phase != ScreenPhase::Entering {
            return SubmitReadiness::Blocked(BlockReason::NotEntering);
        }
        let Some(validated) = form.validate() else {
            return SubmitReadiness::Blocked(BlockReason::IncompleteForm);
        };
        if state.kyc_required {
            return SubmitReadiness::Blocked(BlockReason::KycRequired);
        }
        // A quote fetched for an earlier form must not be paid.
        let request = SellQuoteRequest::from(&validated);
        let Some(info) = state.payment_information_for(&request) else {
            return SubmitReadiness::Blocked(BlockReason::MissingPaymentInformation);
        };
        let Some(wallet_address) = self.wallet.current_address() else {
            return SubmitReadiness::Blocked(BlockReason::NoWalletAddress);
        };

        SubmitReadiness::Ready(SubmitPlan {
            bank_account_id: validated.bank_account.id,
            currency: validated.currency.name,
            payment_request: info.payment_request.clone(),
            wallet_address,
        })
    }

    pub async fn submit(&self, form: &FormData) -> SubmitOutcome {
        let (plan, epoch) = {
            let mut state = self.state.write().await;
            match self.readiness(form, &state) {
                SubmitReadiness::Blocked(reason) => {
                    debug!(?reason, "submission blocked");
                    return SubmitOutcome::Blocked(reason);
                }
                SubmitReadiness::Ready(plan) => {
                    state.phase = ScreenPhase::Completing;
                    state.failure = None;
                    (plan, state.submission_epoch)
                }
            }
        };

        info!(
            bank_account = plan.bank_account_id,
            currency = %plan.currency,
            wallet = %plan.wallet_address,
            "submitting sell payment"
        );
        let result = self.execute(&plan).await;

        let mut state = self.state.write().await;
        if state.submission_epoch != epoch {
            debug!("asset changed during submission, dropping result");
            return SubmitOutcome::Cancelled;
        }
        match result {
            Ok(()) => {
                state.phase = ScreenPhase::Completed;
                SubmitOutcome::Completed
            }
            Err(failure) => {
                warn!(%failure, "sell submission failed");
                state.phase = ScreenPhase::Entering;
                state.failure = Some(failure.clone());
                SubmitOutcome::Failed(failure)
            }
        }
    }

    async fn execute(&self, plan: &SubmitPlan) -> Result<(), FlowFailure> {
        let update = BankAccountUpdate {
            preferred_currency: Some(plan.currency.clone()),
        };
        let updated = self
            .bank_account_service
            .update_bank_account(plan.bank_account_id, update)
            .await
            .map_err(|e| FlowFailure::PreferenceUpdateFailed(e.to_string()))?;

        {
            let mut accounts = self.bank_accounts.write().await;
            if let Some(slot) = accounts.iter_mut().find(|a| a.id == updated.id) {
                *slot = updated;
            }
        }

        self.wallet
            .send_payment(&plan.payment_request)
            .await
            .map_err(|e| FlowFailure::PaymentFailed(e.to_string()))
    }
}
