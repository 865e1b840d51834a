//! Repository abstractions for data access.

pub mod report;
pub mod settlement;

pub use report::ReportRepository;
pub use settlement::{SettlementError, SettlementRepository};
