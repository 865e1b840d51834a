//! Daily cash settlement routes.
//!
//! The settlement report is always recomputed from opening balances plus
//! the day's payments. The persisted closing amount only exists to seed
//! the next day's opening balance.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error_response;
use crate::routes::reports::{PaymentDetailResponse, format_money, internal_error, payment_detail_to_response};
use fixhub_core::reports::NamedRef;
use fixhub_shared::AppError;
use fixhub_core::settlement::CashSettlementService;
use fixhub_core::window::DateWindow;
use fixhub_db::{ReportRepository, SettlementError, SettlementRepository};

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/branches/{branch_id}/cash-settlement",
            get(get_cash_settlement),
        )
        .route(
            "/companies/{company_id}/branches/{branch_id}/opening-balance",
            put(put_opening_balance),
        )
        .route(
            "/companies/{company_id}/branches/{branch_id}/closing-balance",
            put(put_closing_balance),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Query parameters for the settlement report.
#[derive(Debug, Deserialize)]
pub struct SettlementQuery {
    /// Settlement date (defaults to today).
    pub date: Option<NaiveDate>,
}

/// Request body for setting an opening balance.
#[derive(Debug, Deserialize)]
pub struct SetOpeningBalanceRequest {
    /// Balance date.
    pub date: NaiveDate,
    /// Payment method the balance belongs to.
    pub payment_method_id: Uuid,
    /// Cash on hand at the start of the day.
    pub opening_amount: Decimal,
}

/// Request body for setting a closing balance.
#[derive(Debug, Deserialize)]
pub struct SetClosingBalanceRequest {
    /// Balance date.
    pub date: NaiveDate,
    /// Payment method the balance belongs to.
    pub payment_method_id: Uuid,
    /// Counted cash at the end of the day.
    pub closing_amount: Decimal,
}

/// Per-method row in the settlement response.
#[derive(Debug, Serialize)]
pub struct MethodSettlementResponse {
    /// Payment method.
    pub method: NamedRef,
    /// Opening balance.
    pub opening_balance: String,
    /// Amount received during the day.
    pub received_amount: String,
    /// Opening plus received.
    pub closing_balance: String,
}

/// Totals block of the settlement response.
#[derive(Debug, Serialize)]
pub struct SettlementTotalsResponse {
    /// Sum of opening balances.
    pub total_opening: String,
    /// Sum of received amounts.
    pub total_received: String,
    /// Sum of closing balances.
    pub total_closing: String,
}

/// Daily cash settlement response.
#[derive(Debug, Serialize)]
pub struct CashSettlementResponse {
    /// Settlement date.
    pub date: String,
    /// Branch id.
    pub branch_id: Uuid,
    /// Branch name.
    pub branch_name: String,
    /// One row per active payment method.
    pub by_method: Vec<MethodSettlementResponse>,
    /// Payments counted into the settlement.
    pub transactions: Vec<PaymentDetailResponse>,
    /// Totals.
    pub totals: SettlementTotalsResponse,
}

/// Response after recording a closing balance.
#[derive(Debug, Serialize)]
pub struct ClosingBalanceResponse {
    /// Balance date.
    pub date: String,
    /// Payment method.
    pub payment_method_id: Uuid,
    /// Recorded closing amount.
    pub closing_amount: String,
    /// Date whose opening balance was seeded from this closing amount.
    pub carried_forward_to: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn settlement_error_to_response(e: &SettlementError, context: &str) -> Response {
    let err = match e {
        SettlementError::BranchNotFound(branch_id) => {
            AppError::NotFound(format!("Branch {branch_id}"))
        }
        SettlementError::DateOutOfRange(date) => {
            AppError::Validation(format!("Date out of range: {date}"))
        }
        SettlementError::Database(db_err) => {
            error!(error = %db_err, "{context}");
            AppError::Database(context.to_string())
        }
    };
    error_response(&err)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /companies/{company_id}/branches/{branch_id}/cash-settlement
#[axum::debug_handler]
async fn get_cash_settlement(
    State(state): State<AppState>,
    Path((company_id, branch_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<SettlementQuery>,
) -> impl IntoResponse {
    let date = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let settlement_repo = SettlementRepository::new((*state.db).clone());
    let branch = match settlement_repo.find_branch(company_id, branch_id).await {
        Ok(branch) => branch,
        Err(e) => return settlement_error_to_response(&e, "Failed to load branch"),
    };
    let openings = match settlement_repo.opening_balances(branch_id, date).await {
        Ok(openings) => openings,
        Err(e) => return settlement_error_to_response(&e, "Failed to load opening balances"),
    };

    let report_repo = ReportRepository::new((*state.db).clone());
    let methods = match report_repo.active_payment_methods(company_id).await {
        Ok(methods) => methods,
        Err(e) => {
            error!(error = %e, "Failed to load payment methods");
            return internal_error("Failed to generate cash settlement");
        }
    };
    let payments = match report_repo
        .load_payment_rows(company_id, Some(branch_id), DateWindow::day(date))
        .await
    {
        Ok(payments) => payments,
        Err(e) => {
            error!(error = %e, "Failed to load payment rows");
            return internal_error("Failed to generate cash settlement");
        }
    };

    let settlement = CashSettlementService::build_daily_settlement(
        date,
        branch_id,
        branch.name,
        &methods,
        &openings,
        payments,
    );

    let response = CashSettlementResponse {
        date: settlement.date.to_string(),
        branch_id: settlement.branch_id,
        branch_name: settlement.branch_name,
        by_method: settlement
            .by_method
            .iter()
            .map(|row| MethodSettlementResponse {
                method: NamedRef {
                    id: row.method.id,
                    name: row.method.name.clone(),
                },
                opening_balance: format_money(row.opening_balance),
                received_amount: format_money(row.received_amount),
                closing_balance: format_money(row.closing_balance),
            })
            .collect(),
        transactions: settlement
            .transactions
            .iter()
            .map(payment_detail_to_response)
            .collect(),
        totals: SettlementTotalsResponse {
            total_opening: format_money(settlement.totals.total_opening),
            total_received: format_money(settlement.totals.total_received),
            total_closing: format_money(settlement.totals.total_closing),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// PUT /companies/{company_id}/branches/{branch_id}/opening-balance
#[axum::debug_handler]
async fn put_opening_balance(
    State(state): State<AppState>,
    Path((company_id, branch_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetOpeningBalanceRequest>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    if let Err(e) = repo.find_branch(company_id, branch_id).await {
        return settlement_error_to_response(&e, "Failed to load branch");
    }

    match repo
        .set_opening_balance(
            company_id,
            branch_id,
            request.date,
            request.payment_method_id,
            request.opening_amount,
        )
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "date": request.date.to_string(),
                "payment_method_id": request.payment_method_id,
                "opening_amount": format_money(request.opening_amount)
            })),
        )
            .into_response(),
        Err(e) => settlement_error_to_response(&e, "Failed to set opening balance"),
    }
}

/// PUT /companies/{company_id}/branches/{branch_id}/closing-balance
#[axum::debug_handler]
async fn put_closing_balance(
    State(state): State<AppState>,
    Path((company_id, branch_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetClosingBalanceRequest>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    if let Err(e) = repo.find_branch(company_id, branch_id).await {
        return settlement_error_to_response(&e, "Failed to load branch");
    }

    match repo
        .set_closing_balance_and_carry_forward(
            company_id,
            branch_id,
            request.date,
            request.payment_method_id,
            request.closing_amount,
        )
        .await
    {
        Ok(carried_to) => (
            StatusCode::OK,
            Json(ClosingBalanceResponse {
                date: request.date.to_string(),
                payment_method_id: request.payment_method_id,
                closing_amount: format_money(request.closing_amount),
                carried_forward_to: carried_to.to_string(),
            }),
        )
            .into_response(),
        Err(e) => settlement_error_to_response(&e, "Failed to set closing balance"),
    }
}
