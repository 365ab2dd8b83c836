//! Domain layer: sell form values, quotes, screen phases and the ports the
//! flow uses to reach external services.

pub mod amount;
pub mod bank_account;
pub mod currency;
pub mod form;
pub mod phase;
pub mod ports;
pub mod quote;
