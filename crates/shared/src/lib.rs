//! Shared errors and configuration for Fixhub.
//!
//! This crate provides common types for the service:
//! - Application-wide error types with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
