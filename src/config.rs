use crate::application::sell_flow::FlowSettings;
use crate::domain::currency::Fiat;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

fn default_debounce_ms() -> u64 {
    500
}

/// Pricing for selling one asset into one currency.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Tariff {
    pub asset: String,
    pub currency: String,
    /// Fiat paid per unit of the asset, before fees.
    pub price: Decimal,
    /// Fee in percent of the gross payout.
    pub fee_percent: Decimal,
    #[serde(default)]
    pub min_fee: Decimal,
    #[serde(default)]
    pub min_volume: Decimal,
    /// Payment URI the wallet pays into, e.g. `bitcoin:bc1q...`.
    pub deposit_uri: String,
}

/// File-based configuration for the `sell-flow` binary.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SellFlowConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Largest payout allowed without further identification.
    #[serde(default)]
    pub kyc_limit: Option<Decimal>,
    pub currencies: Vec<Fiat>,
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
    /// IBANs whose owners have not completed identification.
    #[serde(default)]
    pub ident_incomplete_ibans: Vec<String>,
}

impl SellFlowConfig {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}
