//! Report routes.
//!
//! Each handler loads flat rows through `ReportRepository`, hands them to
//! the pure generators in `fixhub_core::reports`, and shapes the JSON
//! response. Monetary values are rendered as fixed-point strings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error_response;
use fixhub_shared::AppError;
use fixhub_core::reports::{
    BookingReport, BrandReport, FaultReport, NamedRef, PaymentRow, ReportService, ReportTotals,
    ServiceRow, ServiceStatus, TechnicianReport, TransactionsReport,
};
use fixhub_core::window::DateWindow;
use fixhub_db::ReportRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/reports/bookings",
            get(get_booking_report),
        )
        .route(
            "/companies/{company_id}/reports/technicians",
            get(get_technician_report),
        )
        .route(
            "/companies/{company_id}/reports/brands",
            get(get_brand_report),
        )
        .route(
            "/companies/{company_id}/reports/faults",
            get(get_fault_report),
        )
        .route(
            "/companies/{company_id}/reports/transactions",
            get(get_transactions_report),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters shared by all report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Start date (defaults to the first of the current month).
    pub from: Option<NaiveDate>,
    /// End date (defaults to today).
    pub to: Option<NaiveDate>,
    /// Optional branch filter.
    pub branch_id: Option<Uuid>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Service row in report detail lists.
#[derive(Debug, Serialize)]
pub struct ServiceDetailResponse {
    /// Service id.
    pub id: Uuid,
    /// Ticket number.
    pub ticket_number: String,
    /// Status.
    pub status: ServiceStatus,
    /// Revenue attributed to the service.
    pub revenue: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Completion timestamp, if completed.
    pub completed_at: Option<String>,
    /// Booking user.
    pub booked_by: Option<NamedRef>,
    /// Assigned technician.
    pub technician: Option<NamedRef>,
    /// Device brand.
    pub brand: Option<NamedRef>,
    /// Fault tags.
    pub faults: Vec<NamedRef>,
}

/// Payment row in report detail lists.
#[derive(Debug, Serialize)]
pub struct PaymentDetailResponse {
    /// Payment entry id.
    pub id: Uuid,
    /// Paid amount.
    pub amount: String,
    /// Payment timestamp.
    pub paid_at: String,
    /// Payment method.
    pub method: NamedRef,
    /// Linked service id, if any.
    pub service_id: Option<Uuid>,
    /// Ticket number of the linked service.
    pub ticket_number: Option<String>,
    /// Customer of the linked service.
    pub customer_name: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// External transaction reference.
    pub transaction_id: Option<String>,
}

/// Totals block for service reports.
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    /// Included services, each counted once.
    pub service_count: u64,
    /// Revenue across included services.
    pub total_revenue: String,
    /// Average revenue per included service.
    pub avg_per_service: String,
}

/// Booking summary row.
#[derive(Debug, Serialize)]
pub struct BookingSummaryResponse {
    /// Booking user.
    pub user: NamedRef,
    /// Services booked.
    pub service_count: u64,
    /// Revenue.
    pub total_revenue: String,
    /// Average per service.
    pub avg_per_service: String,
}

/// Booking report response.
#[derive(Debug, Serialize)]
pub struct BookingReportResponse {
    /// Report type identifier.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Summary rows.
    pub summary: Vec<BookingSummaryResponse>,
    /// Detail rows.
    pub details: Vec<ServiceDetailResponse>,
    /// Totals.
    pub totals: TotalsResponse,
}

/// Technician summary row.
#[derive(Debug, Serialize)]
pub struct TechnicianSummaryResponse {
    /// Technician.
    pub user: NamedRef,
    /// Completed services.
    pub completed_count: u64,
    /// Pending services.
    pub pending_count: u64,
    /// Completed plus pending.
    pub service_count: u64,
    /// Revenue.
    pub total_revenue: String,
    /// Average per service.
    pub avg_per_service: String,
    /// Average completion time in hours.
    pub avg_completion_hours: Option<String>,
}

/// Technician report response.
#[derive(Debug, Serialize)]
pub struct TechnicianReportResponse {
    /// Report type identifier.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Summary rows.
    pub summary: Vec<TechnicianSummaryResponse>,
    /// Detail rows.
    pub details: Vec<ServiceDetailResponse>,
    /// Totals.
    pub totals: TotalsResponse,
}

/// Brand summary row.
#[derive(Debug, Serialize)]
pub struct BrandSummaryResponse {
    /// Device brand.
    pub brand: NamedRef,
    /// Services.
    pub service_count: u64,
    /// Revenue.
    pub total_revenue: String,
    /// Average per service.
    pub avg_per_service: String,
}

/// Brand report response.
#[derive(Debug, Serialize)]
pub struct BrandReportResponse {
    /// Report type identifier.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Summary rows.
    pub summary: Vec<BrandSummaryResponse>,
    /// Detail rows.
    pub details: Vec<ServiceDetailResponse>,
    /// Totals.
    pub totals: TotalsResponse,
}

/// Fault summary row.
#[derive(Debug, Serialize)]
pub struct FaultSummaryResponse {
    /// Fault tag.
    pub fault: NamedRef,
    /// Services tagged with this fault.
    pub service_count: u64,
    /// Revenue (full revenue of every tagged service).
    pub total_revenue: String,
    /// Average per service.
    pub avg_per_service: String,
}

/// Fault report response.
#[derive(Debug, Serialize)]
pub struct FaultReportResponse {
    /// Report type identifier.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Summary rows.
    pub summary: Vec<FaultSummaryResponse>,
    /// Detail rows.
    pub details: Vec<ServiceDetailResponse>,
    /// Totals (each service counted once).
    pub totals: TotalsResponse,
}

/// Per-method breakdown row.
#[derive(Debug, Serialize)]
pub struct MethodBreakdownResponse {
    /// Payment method.
    pub method: NamedRef,
    /// Payments taken with this method.
    pub transaction_count: u64,
    /// Amount taken with this method.
    pub total_amount: String,
}

/// Per-day breakdown row.
#[derive(Debug, Serialize)]
pub struct DayBreakdownResponse {
    /// Calendar day.
    pub day: String,
    /// Payments taken that day.
    pub transaction_count: u64,
    /// Amount taken that day.
    pub total_amount: String,
}

/// Transactions report response.
#[derive(Debug, Serialize)]
pub struct TransactionsReportResponse {
    /// Report type identifier.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Breakdown per active payment method.
    pub by_method: Vec<MethodBreakdownResponse>,
    /// Breakdown per calendar day.
    pub by_day: Vec<DayBreakdownResponse>,
    /// Detail rows.
    pub details: Vec<PaymentDetailResponse>,
    /// Totals across all detail rows.
    pub totals: TransactionTotalsResponse,
}

/// Totals block for the transactions report.
#[derive(Debug, Serialize)]
pub struct TransactionTotalsResponse {
    /// Number of payments.
    pub transaction_count: u64,
    /// Amount across all payments.
    pub total_amount: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Formats a Decimal as a string with 2 decimal places.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{amount:.2}")
}

/// Resolves the report window from the query, defaulting to the current
/// month, or produces a 400 response for an inverted range.
pub(crate) fn resolve_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate, DateWindow), Response> {
    let today = chrono::Utc::now().date_naive();
    let from = from.unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
    });
    let to = to.unwrap_or(today);

    match DateWindow::range(from, to) {
        Ok(window) => Ok((from, to, window)),
        Err(e) => Err(error_response(&AppError::Validation(e.to_string()))),
    }
}

/// Standard 500 response for a failed data load.
pub(crate) fn internal_error(message: &str) -> Response {
    error_response(&AppError::Database(message.to_string()))
}

/// Converts a service row into its detail response.
pub(crate) fn service_detail_to_response(row: &ServiceRow) -> ServiceDetailResponse {
    ServiceDetailResponse {
        id: row.id,
        ticket_number: row.ticket_number.clone(),
        status: row.status,
        revenue: format_money(row.revenue()),
        created_at: row.created_at.to_rfc3339(),
        completed_at: row.completed_at.map(|at| at.to_rfc3339()),
        booked_by: row.booked_by.clone(),
        technician: row.technician.clone(),
        brand: row.brand.clone(),
        faults: row.faults.clone(),
    }
}

/// Converts a payment row into its detail response.
pub(crate) fn payment_detail_to_response(row: &PaymentRow) -> PaymentDetailResponse {
    PaymentDetailResponse {
        id: row.id,
        amount: format_money(row.amount),
        paid_at: row.paid_at.to_rfc3339(),
        method: NamedRef {
            id: row.method_id,
            name: row.method_name.clone(),
        },
        service_id: row.service_id,
        ticket_number: row.ticket_number.clone(),
        customer_name: row.customer_name.clone(),
        notes: row.notes.clone(),
        transaction_id: row.transaction_id.clone(),
    }
}

fn totals_to_response(totals: &ReportTotals) -> TotalsResponse {
    TotalsResponse {
        service_count: totals.service_count,
        total_revenue: format_money(totals.total_revenue),
        avg_per_service: format_money(totals.avg_per_service),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /companies/{company_id}/reports/bookings
#[axum::debug_handler]
async fn get_booking_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let (from, to, window) = match resolve_window(query.from, query.to) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let rows = match repo
        .load_service_rows(company_id, query.branch_id, window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load service rows");
            return internal_error("Failed to generate booking report");
        }
    };

    let report: BookingReport = ReportService::generate_booking_report(rows);

    let response = BookingReportResponse {
        report_type: "bookings".to_string(),
        period_start: from.to_string(),
        period_end: to.to_string(),
        summary: report
            .summary
            .iter()
            .map(|row| BookingSummaryResponse {
                user: row.user.clone(),
                service_count: row.service_count,
                total_revenue: format_money(row.total_revenue),
                avg_per_service: format_money(row.avg_per_service),
            })
            .collect(),
        details: report.details.iter().map(service_detail_to_response).collect(),
        totals: totals_to_response(&report.totals),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /companies/{company_id}/reports/technicians
#[axum::debug_handler]
async fn get_technician_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let (from, to, window) = match resolve_window(query.from, query.to) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let rows = match repo
        .load_service_rows(company_id, query.branch_id, window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load service rows");
            return internal_error("Failed to generate technician report");
        }
    };

    let report: TechnicianReport = ReportService::generate_technician_report(rows);

    let response = TechnicianReportResponse {
        report_type: "technicians".to_string(),
        period_start: from.to_string(),
        period_end: to.to_string(),
        summary: report
            .summary
            .iter()
            .map(|row| TechnicianSummaryResponse {
                user: row.user.clone(),
                completed_count: row.completed_count,
                pending_count: row.pending_count,
                service_count: row.service_count,
                total_revenue: format_money(row.total_revenue),
                avg_per_service: format_money(row.avg_per_service),
                avg_completion_hours: row.avg_completion_hours.map(format_money),
            })
            .collect(),
        details: report.details.iter().map(service_detail_to_response).collect(),
        totals: totals_to_response(&report.totals),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /companies/{company_id}/reports/brands
#[axum::debug_handler]
async fn get_brand_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let (from, to, window) = match resolve_window(query.from, query.to) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let rows = match repo
        .load_service_rows(company_id, query.branch_id, window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load service rows");
            return internal_error("Failed to generate brand report");
        }
    };

    let report: BrandReport = ReportService::generate_brand_report(rows);

    let response = BrandReportResponse {
        report_type: "brands".to_string(),
        period_start: from.to_string(),
        period_end: to.to_string(),
        summary: report
            .summary
            .iter()
            .map(|row| BrandSummaryResponse {
                brand: row.brand.clone(),
                service_count: row.service_count,
                total_revenue: format_money(row.total_revenue),
                avg_per_service: format_money(row.avg_per_service),
            })
            .collect(),
        details: report.details.iter().map(service_detail_to_response).collect(),
        totals: totals_to_response(&report.totals),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /companies/{company_id}/reports/faults
#[axum::debug_handler]
async fn get_fault_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let (from, to, window) = match resolve_window(query.from, query.to) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let rows = match repo
        .load_service_rows(company_id, query.branch_id, window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load service rows");
            return internal_error("Failed to generate fault report");
        }
    };

    let report: FaultReport = ReportService::generate_fault_report(rows);

    let response = FaultReportResponse {
        report_type: "faults".to_string(),
        period_start: from.to_string(),
        period_end: to.to_string(),
        summary: report
            .summary
            .iter()
            .map(|row| FaultSummaryResponse {
                fault: row.fault.clone(),
                service_count: row.service_count,
                total_revenue: format_money(row.total_revenue),
                avg_per_service: format_money(row.avg_per_service),
            })
            .collect(),
        details: report.details.iter().map(service_detail_to_response).collect(),
        totals: totals_to_response(&report.totals),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /companies/{company_id}/reports/transactions
#[axum::debug_handler]
async fn get_transactions_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let (from, to, window) = match resolve_window(query.from, query.to) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let payments = match repo
        .load_payment_rows(company_id, query.branch_id, window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load payment rows");
            return internal_error("Failed to generate transactions report");
        }
    };
    let methods = match repo.active_payment_methods(company_id).await {
        Ok(methods) => methods,
        Err(e) => {
            error!(error = %e, "Failed to load payment methods");
            return internal_error("Failed to generate transactions report");
        }
    };

    let report: TransactionsReport =
        ReportService::generate_transactions_report(payments, &methods);

    let response = TransactionsReportResponse {
        report_type: "transactions".to_string(),
        period_start: from.to_string(),
        period_end: to.to_string(),
        by_method: report
            .by_method
            .iter()
            .map(|row| MethodBreakdownResponse {
                method: NamedRef {
                    id: row.method.id,
                    name: row.method.name.clone(),
                },
                transaction_count: row.transaction_count,
                total_amount: format_money(row.total_amount),
            })
            .collect(),
        by_day: report
            .by_day
            .iter()
            .map(|row| DayBreakdownResponse {
                day: row.day.to_string(),
                transaction_count: row.transaction_count,
                total_amount: format_money(row.total_amount),
            })
            .collect(),
        details: report.details.iter().map(payment_detail_to_response).collect(),
        totals: TransactionTotalsResponse {
            transaction_count: report.totals.transaction_count,
            total_amount: format_money(report.totals.total_amount),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
