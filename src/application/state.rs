use crate::domain::form::FormData;
use crate::domain::phase::{FlowFailure, ScreenPhase};
use crate::domain::quote::{PaymentInformation, SellQuoteRequest};

/// Mutable state shared between the refresher, the submission controller
/// and the flow facade.
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub phase: ScreenPhase,
    pub loading: bool,
    pub kyc_required: bool,
    /// Field-level message for the amount input.
    pub amount_error: Option<String>,
    /// Last projected quote. Kept while KYC blocks it so the block can lift
    /// without a refetch.
    pub payment_information: Option<PaymentInformation>,
    /// Request the stored quote was fetched for.
    pub quoted_request: Option<SellQuoteRequest>,
    pub failure: Option<FlowFailure>,
    /// Bumped whenever the asset changes; an in-flight submission that sees a
    /// different epoch on completion is discarded.
    pub submission_epoch: u64,
}

impl FlowState {
    pub fn displayed_payment_information(&self) -> Option<&PaymentInformation> {
        if self.kyc_required || self.amount_error.is_some() {
            None
        } else {
            self.payment_information.as_ref()
        }
    }

    /// The displayed quote, but only if it was fetched for `request`.
    pub fn payment_information_for(&self, request: &SellQuoteRequest) -> Option<&PaymentInformation> {
        if self.quoted_request.as_ref() == Some(request) {
            self.displayed_payment_information()
        } else {
            None
        }
    }

    pub fn clear_amount_feedback(&mut self) {
        self.amount_error = None;
        self.kyc_required = false;
    }
}

/// Immutable snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SellFlowView {
    pub form: FormData,
    pub phase: ScreenPhase,
    pub loading: bool,
    pub kyc_required: bool,
    pub amount_error: Option<String>,
    pub payment_information: Option<PaymentInformation>,
    pub failure: Option<FlowFailure>,
}

impl SellFlowView {
    pub fn new(form: FormData, state: &FlowState) -> Self {
        Self {
            form,
            phase: state.phase,
            loading: state.loading,
            kyc_required: state.kyc_required,
            amount_error: state.amount_error.clone(),
            payment_information: state.displayed_payment_information().cloned(),
            failure: state.failure.clone(),
        }
    }
}
