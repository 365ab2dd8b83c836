use serde::{Deserialize, Serialize};

/// A fiat currency the provider can pay out in.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Fiat {
    pub id: u64,
    /// ISO code, e.g. `EUR`.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_sellable")]
    pub sellable: bool,
}

fn default_sellable() -> bool {
    true
}

impl Fiat {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            symbol: None,
            sellable: true,
        }
    }
}

/// The crypto asset being sold.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
pub struct Asset {
    pub name: String,
}

impl Asset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
