use thiserror::Error;

/// Where the screen is in the sell lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    #[default]
    Entering,
    Completing,
    Completed,
}

/// Failures that are reported to the user instead of aborting the flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowFailure {
    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),
    #[error("Could not save preferred currency: {0}")]
    PreferenceUpdateFailed(String),
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
}

/// Why a submission cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    NotEntering,
    IncompleteForm,
    KycRequired,
    MissingPaymentInformation,
    NoWalletAddress,
}

/// Everything the submission needs once the preconditions hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPlan {
    pub bank_account_id: u64,
    pub currency: String,
    pub payment_request: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReadiness {
    Ready(SubmitPlan),
    Blocked(BlockReason),
}

impl SubmitReadiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Blocked(BlockReason),
    Completed,
    Failed(FlowFailure),
    /// The asset changed while the submission was in flight.
    Cancelled,
}
