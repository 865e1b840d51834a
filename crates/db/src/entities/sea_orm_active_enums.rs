//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a repair ticket, as stored in PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "service_status")]
pub enum ServiceStatus {
    /// Device received, not yet looked at.
    #[sea_orm(string_value = "received")]
    Received,
    /// Diagnosed, waiting for customer approval.
    #[sea_orm(string_value = "diagnosed")]
    Diagnosed,
    /// Repair in progress.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Waiting for spare parts.
    #[sea_orm(string_value = "waiting_for_parts")]
    WaitingForParts,
    /// Repair finished.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Handed back to the customer.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Cancelled by the customer or the shop.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    /// Device could not be repaired.
    #[sea_orm(string_value = "not_serviceable")]
    NotServiceable,
}
