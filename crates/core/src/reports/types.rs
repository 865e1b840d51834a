//! Report input rows and output shapes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a repair ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// Device received, not yet looked at.
    Received,
    /// Diagnosed, waiting for customer approval.
    Diagnosed,
    /// Repair in progress.
    InProgress,
    /// Waiting for spare parts.
    WaitingForParts,
    /// Repair finished.
    Completed,
    /// Handed back to the customer.
    Delivered,
    /// Cancelled by the customer or the shop.
    Cancelled,
    /// Device could not be repaired.
    NotServiceable,
}

impl ServiceStatus {
    /// Whether the ticket counts as completed work (COMPLETED or DELIVERED).
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed | Self::Delivered)
    }

    /// Whether the ticket was closed without work (CANCELLED or NOT_SERVICEABLE).
    ///
    /// Such rows are dropped from technician buckets entirely.
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Cancelled | Self::NotServiceable)
    }
}

/// Id plus display name for a referenced entity (user, brand, fault).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Entity id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Reference to a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRef {
    /// Method id.
    pub id: Uuid,
    /// Method name.
    pub name: String,
}

/// Flat repair-ticket row, already filtered by company/branch/date window.
///
/// Repositories produce these plain rows so the aggregation below never sees
/// ORM types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRow {
    /// Service id.
    pub id: Uuid,
    /// Human-facing ticket number.
    pub ticket_number: String,
    /// Current status.
    pub status: ServiceStatus,
    /// Quoted cost, if any.
    pub estimated_cost: Option<Decimal>,
    /// Final cost, if settled.
    pub actual_cost: Option<Decimal>,
    /// When the ticket was created.
    pub created_at: DateTime<Utc>,
    /// When the repair was completed, if it was.
    pub completed_at: Option<DateTime<Utc>>,
    /// User who created the ticket (booking person).
    pub booked_by: Option<NamedRef>,
    /// Assigned technician.
    pub technician: Option<NamedRef>,
    /// Brand of the linked device.
    pub brand: Option<NamedRef>,
    /// Fault tags attached to the service (many-to-many).
    pub faults: Vec<NamedRef>,
}

impl ServiceRow {
    /// Revenue attributed to this service.
    ///
    /// The actual cost wins over the estimate; a ticket with neither counts
    /// as zero.
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        self.actual_cost
            .or(self.estimated_cost)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Flat payment row, already filtered by company (and optionally branch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    /// Payment entry id.
    pub id: Uuid,
    /// Paid amount.
    pub amount: Decimal,
    /// When the payment was taken.
    pub paid_at: DateTime<Utc>,
    /// Payment method id.
    pub method_id: Uuid,
    /// Payment method name.
    pub method_name: String,
    /// Linked service, if any (standalone ledger entries have none).
    pub service_id: Option<Uuid>,
    /// Ticket number of the linked service.
    pub ticket_number: Option<String>,
    /// Customer name of the linked service.
    pub customer_name: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// External transaction reference.
    pub transaction_id: Option<String>,
}

// ============================================================================
// Summary rows
// ============================================================================

/// Per-booking-person summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummaryRow {
    /// Booking user.
    pub user: NamedRef,
    /// Number of services booked.
    pub service_count: u64,
    /// Revenue across those services.
    pub total_revenue: Decimal,
    /// Average revenue per service.
    pub avg_per_service: Decimal,
}

/// Per-technician summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianSummaryRow {
    /// Technician.
    pub user: NamedRef,
    /// Services in COMPLETED or DELIVERED status.
    pub completed_count: u64,
    /// Services still open (not completed, not cancelled/not-serviceable).
    pub pending_count: u64,
    /// Completed plus pending.
    pub service_count: u64,
    /// Revenue across counted services.
    pub total_revenue: Decimal,
    /// Average revenue per counted service.
    pub avg_per_service: Decimal,
    /// Average hours from ticket creation to completion, divided over the
    /// completed count. `None` when no completed row carries a completion
    /// timestamp.
    pub avg_completion_hours: Option<Decimal>,
}

/// Per-brand summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSummaryRow {
    /// Device brand.
    pub brand: NamedRef,
    /// Number of services for this brand.
    pub service_count: u64,
    /// Revenue across those services.
    pub total_revenue: Decimal,
    /// Average revenue per service.
    pub avg_per_service: Decimal,
}

/// Per-fault summary row.
///
/// A service tagged with several faults contributes its full revenue to
/// every one of them; fault rows therefore overlap and must not be summed
/// to obtain report totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultSummaryRow {
    /// Fault tag.
    pub fault: NamedRef,
    /// Number of services tagged with this fault.
    pub service_count: u64,
    /// Revenue across those services.
    pub total_revenue: Decimal,
    /// Average revenue per service.
    pub avg_per_service: Decimal,
}

/// Totals across every row included in at least one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Number of included services, each counted once.
    pub service_count: u64,
    /// Revenue across included services, each counted once.
    pub total_revenue: Decimal,
    /// Average revenue per included service.
    pub avg_per_service: Decimal,
}

// ============================================================================
// Reports
// ============================================================================

/// Booking-person report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReport {
    /// Summary rows, sorted by total revenue descending.
    pub summary: Vec<BookingSummaryRow>,
    /// Every service row the summary was built from.
    pub details: Vec<ServiceRow>,
    /// Totals across included rows.
    pub totals: ReportTotals,
}

/// Technician report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianReport {
    /// Summary rows, sorted by total revenue descending.
    pub summary: Vec<TechnicianSummaryRow>,
    /// Every service row the summary was built from.
    pub details: Vec<ServiceRow>,
    /// Totals across included rows.
    pub totals: ReportTotals,
}

/// Device-brand report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandReport {
    /// Summary rows, sorted by service count descending.
    pub summary: Vec<BrandSummaryRow>,
    /// Every service row the summary was built from.
    pub details: Vec<ServiceRow>,
    /// Totals across included rows.
    pub totals: ReportTotals,
}

/// Fault-type report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultReport {
    /// Summary rows, sorted by service count descending.
    pub summary: Vec<FaultSummaryRow>,
    /// Every service row the summary was built from.
    pub details: Vec<ServiceRow>,
    /// Totals across included rows, each service counted once even when it
    /// appears in several fault groups.
    pub totals: ReportTotals,
}

/// Per-method breakdown row for the transactions report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBreakdownRow {
    /// Payment method.
    pub method: PaymentMethodRef,
    /// Number of payments taken with this method.
    pub transaction_count: u64,
    /// Amount taken with this method.
    pub total_amount: Decimal,
}

/// Per-day breakdown row for the transactions report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBreakdownRow {
    /// Calendar day.
    pub day: NaiveDate,
    /// Number of payments taken that day.
    pub transaction_count: u64,
    /// Amount taken that day.
    pub total_amount: Decimal,
}

/// Totals across the full payment detail list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Number of payments.
    pub transaction_count: u64,
    /// Amount across all payments.
    pub total_amount: Decimal,
}

/// Transactions report over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsReport {
    /// Breakdown per currently-active payment method. Every active method
    /// gets a row (zero-filled when it took no payments); inactive methods
    /// never appear, even when they have payments in the window.
    pub by_method: Vec<MethodBreakdownRow>,
    /// Breakdown per calendar day, ascending.
    pub by_day: Vec<DayBreakdownRow>,
    /// Every payment row in the window.
    pub details: Vec<PaymentRow>,
    /// Totals across the full detail list.
    pub totals: TransactionTotals,
}
