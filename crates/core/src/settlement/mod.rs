//! Daily cash settlement.
//!
//! Pure computation of the per-method opening, received, and closing
//! balances for one branch and one calendar date. Loading the inputs and
//! persisting opening/closing balances (including the explicit carry-forward
//! into the next day) is the repository layer's job.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::CashSettlementService;
pub use types::*;
