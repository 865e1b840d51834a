//! Operational report generation.
//!
//! This module provides pure business logic for the five fixed report
//! groupings over repair-shop data:
//! - Bookings (services grouped by the user who created the ticket)
//! - Technicians (services grouped by assignee, with completion stats)
//! - Brands (services grouped by the linked device's brand)
//! - Faults (services fanned out to every fault tag they carry)
//! - Transactions (payments grouped by method and by calendar day)

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
