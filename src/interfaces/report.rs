use crate::application::state::SellFlowView;
use crate::domain::phase::{BlockReason, ScreenPhase, SubmitOutcome};
use std::io::{self, Write};

/// Hint shown in place of the quote while identification is pending.
pub const KYC_HINT: &str = "Identification required before selling this amount";

/// Writes a sell flow snapshot as `key: value` lines.
pub struct ReportWriter<W: Write> {
    out: W,
}

fn phase_label(phase: ScreenPhase) -> &'static str {
    match phase {
        ScreenPhase::Entering => "entering",
        ScreenPhase::Completing => "completing",
        ScreenPhase::Completed => "completed",
    }
}

fn block_label(reason: BlockReason) -> &'static str {
    match reason {
        BlockReason::NotEntering => "not entering",
        BlockReason::IncompleteForm => "incomplete form",
        BlockReason::KycRequired => "kyc required",
        BlockReason::MissingPaymentInformation => "no quote",
        BlockReason::NoWalletAddress => "no wallet address",
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_view(&mut self, view: &SellFlowView) -> io::Result<()> {
        let form = &view.form;
        if let Some(account) = &form.bank_account {
            writeln!(self.out, "bank_account: {} ({})", account.id, account.display_name())?;
        }
        if let Some(asset) = &form.asset {
            writeln!(self.out, "asset: {}", asset.name)?;
        }
        if let Some(currency) = &form.currency {
            writeln!(self.out, "currency: {}", currency.name)?;
        }
        writeln!(self.out, "amount: {}", form.amount)?;
        writeln!(self.out, "phase: {}", phase_label(view.phase))?;

        if let Some(info) = &view.payment_information {
            writeln!(self.out, "estimated_amount: {}", info.estimated_amount)?;
            writeln!(self.out, "fee: {}", info.fee)?;
            if let Some(min_fee) = &info.min_fee {
                writeln!(self.out, "min_fee: {}", min_fee)?;
            }
            writeln!(self.out, "payment_request: {}", info.payment_request)?;
        }
        if let Some(error) = &view.amount_error {
            writeln!(self.out, "error: {}", error)?;
        }
        if view.kyc_required {
            writeln!(self.out, "kyc: {}", KYC_HINT)?;
        }
        if let Some(failure) = &view.failure {
            writeln!(self.out, "failure: {}", failure)?;
        }
        Ok(())
    }

    pub fn write_outcome(&mut self, outcome: &SubmitOutcome) -> io::Result<()> {
        match outcome {
            SubmitOutcome::Blocked(reason) => {
                writeln!(self.out, "submit: blocked ({})", block_label(*reason))
            }
            SubmitOutcome::Completed => writeln!(self.out, "submit: completed"),
            SubmitOutcome::Failed(failure) => writeln!(self.out, "submit: failed ({})", failure),
            SubmitOutcome::Cancelled => writeln!(self.out, "submit: cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::FlowState;
    use crate::domain::currency::{Asset, Fiat};
    use crate::domain::form::FormData;
    use crate::domain::phase::FlowFailure;
    use crate::domain::quote::PaymentInformation;

    fn render(view: &SellFlowView, outcome: Option<SubmitOutcome>) -> String {
        let mut buf = Vec::new();
        let mut writer = ReportWriter::new(&mut buf);
        writer.write_view(view).unwrap();
        if let Some(outcome) = outcome {
            writer.write_outcome(&outcome).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_view_with_quote() {
        let form = FormData {
            asset: Some(Asset::new("BTC")),
            currency: Some(Fiat::new(1, "EUR")),
            amount: "100".into(),
            ..Default::default()
        };
        let state = FlowState {
            payment_information: Some(PaymentInformation {
                estimated_amount: "≈ 95 EUR (incl. DFX fees)".into(),
                fee: "2 %".into(),
                min_fee: Some("1 EUR".into()),
                payment_request: "pay:xyz".into(),
            }),
            ..Default::default()
        };
        let output = render(&SellFlowView::new(form, &state), Some(SubmitOutcome::Completed));

        assert!(output.contains("asset: BTC\n"));
        assert!(output.contains("phase: entering\n"));
        assert!(output.contains("estimated_amount: ≈ 95 EUR (incl. DFX fees)\n"));
        assert!(output.contains("min_fee: 1 EUR\n"));
        assert!(output.ends_with("submit: completed\n"));
    }

    #[test]
    fn test_write_view_with_errors() {
        let state = FlowState {
            kyc_required: true,
            failure: Some(FlowFailure::PaymentFailed("rejected".into())),
            ..Default::default()
        };
        let output = render(
            &SellFlowView::new(FormData::default(), &state),
            Some(SubmitOutcome::Blocked(BlockReason::KycRequired)),
        );

        assert!(output.contains(&format!("kyc: {}\n", KYC_HINT)));
        assert!(output.contains("failure: Payment failed: rejected\n"));
        assert!(output.contains("submit: blocked (kyc required)\n"));
        assert!(!output.contains("estimated_amount"));
    }
}
