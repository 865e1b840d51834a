//! Core business logic for Fixhub.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Repositories hand the functions here flat vectors of plain rows; everything is
//! grouped and reduced in memory, which keeps the logic unit-testable without a
//! database.
//!
//! # Modules
//!
//! - `reports` - Grouping and rollup for the operational reports
//! - `settlement` - Daily per-method cash settlement
//! - `window` - Inclusive day-boundary helpers for date filtering

pub mod reports;
pub mod settlement;
pub mod window;
