use serde::{Deserialize, Serialize};

/// A payout bank account owned by the user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct BankAccount {
    pub id: u64,
    pub iban: String,
    /// Free-text name shown in the account picker.
    #[serde(default)]
    pub label: Option<String>,
    /// Currency code the user last sold into from this account.
    #[serde(default)]
    pub preferred_currency: Option<String>,
}

impl BankAccount {
    pub fn new(id: u64, iban: impl Into<String>) -> Self {
        Self {
            id,
            iban: iban.into(),
            label: None,
            preferred_currency: None,
        }
    }

    pub fn with_preferred_currency(mut self, code: impl Into<String>) -> Self {
        self.preferred_currency = Some(code.into());
        self
    }

    /// Applies an update in place.
    pub fn apply(&mut self, update: &BankAccountUpdate) {
        if let Some(code) = &update.preferred_currency {
            self.preferred_currency = Some(code.clone());
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.iban)
    }
}

/// Partial update sent to the bank account service.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct BankAccountUpdate {
    pub preferred_currency: Option<String>,
}
