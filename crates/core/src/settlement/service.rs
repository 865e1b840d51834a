//! Cash settlement computation.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::reports::{PaymentMethodRef, PaymentRow};

use super::types::{DailyCashSettlement, MethodSettlementRow, SettlementTotals};

/// Service for computing daily cash settlements.
pub struct CashSettlementService;

impl CashSettlementService {
    /// Builds the daily settlement from pre-loaded rows.
    ///
    /// `methods` must already be filtered to currently-active methods and
    /// `payments` to the branch and day under settlement; this function only
    /// reduces. Methods without an entry in `openings` open at zero, and
    /// every closing balance is computed as opening plus received.
    #[must_use]
    pub fn build_daily_settlement(
        date: NaiveDate,
        branch_id: Uuid,
        branch_name: String,
        methods: &[PaymentMethodRef],
        openings: &HashMap<Uuid, Decimal>,
        payments: Vec<PaymentRow>,
    ) -> DailyCashSettlement {
        let mut received: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in &payments {
            *received.entry(payment.method_id).or_insert(Decimal::ZERO) += payment.amount;
        }

        let mut totals = SettlementTotals::default();
        let by_method: Vec<MethodSettlementRow> = methods
            .iter()
            .map(|method| {
                let opening = openings.get(&method.id).copied().unwrap_or(Decimal::ZERO);
                let received = received.get(&method.id).copied().unwrap_or(Decimal::ZERO);
                let closing = opening + received;

                totals.total_opening += opening;
                totals.total_received += received;
                totals.total_closing += closing;

                MethodSettlementRow {
                    method: method.clone(),
                    opening_balance: opening,
                    received_amount: received,
                    closing_balance: closing,
                }
            })
            .collect();

        DailyCashSettlement {
            date,
            branch_id,
            branch_name,
            by_method,
            transactions: payments,
            totals,
        }
    }
}
