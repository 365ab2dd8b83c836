//! Application layer orchestrating the sell screen.
//!
//! `SellFlow` ties the form state to a debounced `QuoteRefresher` and a
//! `SubmissionController`. Shared state lives behind `tokio` locks and every
//! quote fetch runs in its own task, guarded by generation numbers.

pub mod quote_refresher;
pub mod sell_flow;
pub mod state;
pub mod submission;
