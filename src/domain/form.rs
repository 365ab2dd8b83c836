use super::amount::Amount;
use super::bank_account::BankAccount;
use super::currency::{Asset, Fiat};
use tokio::sync::watch;

/// Raw field values as the user fills in the sell form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormData {
    pub bank_account: Option<BankAccount>,
    pub asset: Option<Asset>,
    pub currency: Option<Fiat>,
    pub amount: String,
}

/// A completely filled form with a positive numeric amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedData {
    pub bank_account: BankAccount,
    pub asset: Asset,
    pub currency: Fiat,
    pub amount: Amount,
}

impl FormData {
    /// Returns `None` while any field is missing or the amount is not a
    /// positive number.
    pub fn validate(&self) -> Option<ValidatedData> {
        let amount = Amount::parse(&self.amount).ok()?;
        Some(ValidatedData {
            bank_account: self.bank_account.clone()?,
            asset: self.asset.clone()?,
            currency: self.currency.clone()?,
            amount,
        })
    }
}

/// Owns the form fields and broadcasts every mutation.
///
/// Subscribers receive the full `FormData` snapshot; the debounced quote
/// refresher is the main consumer.
pub struct FormState {
    sender: watch::Sender<FormData>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FormData::default());
        Self { sender }
    }

    pub fn snapshot(&self) -> FormData {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormData> {
        self.sender.subscribe()
    }

    pub fn set_bank_account(&self, account: BankAccount) {
        self.sender.send_modify(|form| form.bank_account = Some(account));
    }

    pub fn set_asset(&self, asset: Asset) {
        self.sender.send_modify(|form| form.asset = Some(asset));
    }

    pub fn set_currency(&self, currency: Fiat) {
        self.sender.send_modify(|form| form.currency = Some(currency));
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        self.sender.send_modify(|form| form.amount = amount);
    }

    /// Switches to another asset and clears the amount, which was entered in
    /// units of the previous asset.
    pub fn reset_for_asset(&self, asset: Asset) {
        self.sender.send_modify(|form| {
            form.asset = Some(asset);
            form.amount.clear();
        });
    }
}
