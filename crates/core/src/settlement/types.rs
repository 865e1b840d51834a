//! Cash settlement data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reports::{PaymentMethodRef, PaymentRow};

/// Per-method settlement row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSettlementRow {
    /// Payment method.
    pub method: PaymentMethodRef,
    /// Cash on hand at the start of the day. Zero when no opening balance
    /// was recorded for this method.
    pub opening_balance: Decimal,
    /// Amount received during the day.
    pub received_amount: Decimal,
    /// Opening plus received. Always computed here, never read from the
    /// independently-settable persisted closing amount.
    pub closing_balance: Decimal,
}

/// Totals across the per-method rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementTotals {
    /// Sum of opening balances.
    pub total_opening: Decimal,
    /// Sum of received amounts.
    pub total_received: Decimal,
    /// Sum of closing balances.
    pub total_closing: Decimal,
}

/// Daily cash settlement report for one branch and one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCashSettlement {
    /// Settlement date.
    pub date: NaiveDate,
    /// Branch id.
    pub branch_id: Uuid,
    /// Branch name.
    pub branch_name: String,
    /// One row per currently-active payment method.
    pub by_method: Vec<MethodSettlementRow>,
    /// Every payment counted into the settlement.
    pub transactions: Vec<PaymentRow>,
    /// Totals across the per-method rows.
    pub totals: SettlementTotals,
}
