//! Tests for the cash settlement module.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::reports::{PaymentMethodRef, PaymentRow};

use super::service::CashSettlementService;

fn method(name: &str) -> PaymentMethodRef {
    PaymentMethodRef {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

fn payment(method: &PaymentMethodRef, amount: Decimal) -> PaymentRow {
    PaymentRow {
        id: Uuid::new_v4(),
        amount,
        paid_at: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        method_id: method.id,
        method_name: method.name.clone(),
        service_id: Some(Uuid::new_v4()),
        ticket_number: Some("T-0042".to_string()),
        customer_name: Some("Sam".to_string()),
        notes: None,
        transaction_id: None,
    }
}

fn settlement_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
}

#[test]
fn test_closing_is_computed_from_opening_plus_received() {
    let cash = method("Cash");
    let openings = HashMap::from([(cash.id, dec!(1000))]);
    let payments = vec![payment(&cash, dec!(150)), payment(&cash, dec!(100))];

    let report = CashSettlementService::build_daily_settlement(
        settlement_date(),
        Uuid::new_v4(),
        "Downtown".to_string(),
        &[cash],
        &openings,
        payments,
    );

    assert_eq!(report.by_method.len(), 1);
    assert_eq!(report.by_method[0].opening_balance, dec!(1000));
    assert_eq!(report.by_method[0].received_amount, dec!(250));
    assert_eq!(report.by_method[0].closing_balance, dec!(1250));
}

#[test]
fn test_method_without_opening_record_opens_at_zero() {
    let card = method("Card");
    let report = CashSettlementService::build_daily_settlement(
        settlement_date(),
        Uuid::new_v4(),
        "Downtown".to_string(),
        &[card.clone()],
        &HashMap::new(),
        vec![payment(&card, dec!(75))],
    );

    assert_eq!(report.by_method[0].opening_balance, Decimal::ZERO);
    assert_eq!(report.by_method[0].closing_balance, dec!(75));
}

#[test]
fn test_inactive_method_payments_do_not_create_rows() {
    let cash = method("Cash");
    let retired = method("Cheque");
    let report = CashSettlementService::build_daily_settlement(
        settlement_date(),
        Uuid::new_v4(),
        "Downtown".to_string(),
        &[cash.clone()],
        &HashMap::new(),
        vec![payment(&retired, dec!(60)), payment(&cash, dec!(40))],
    );

    // Only the active method appears in the breakdown.
    assert_eq!(report.by_method.len(), 1);
    assert_eq!(report.by_method[0].method.id, cash.id);
    assert_eq!(report.by_method[0].received_amount, dec!(40));
    // The transaction detail list is untouched.
    assert_eq!(report.transactions.len(), 2);
}

#[test]
fn test_totals_sum_the_method_rows() {
    let cash = method("Cash");
    let card = method("Card");
    let openings = HashMap::from([(cash.id, dec!(500)), (card.id, dec!(200))]);
    let report = CashSettlementService::build_daily_settlement(
        settlement_date(),
        Uuid::new_v4(),
        "Downtown".to_string(),
        &[cash.clone(), card.clone()],
        &openings,
        vec![payment(&cash, dec!(100)), payment(&card, dec!(50))],
    );

    assert_eq!(report.totals.total_opening, dec!(700));
    assert_eq!(report.totals.total_received, dec!(150));
    assert_eq!(report.totals.total_closing, dec!(850));
}

proptest! {
    /// closing = opening + received holds for every row, and the totals row
    /// re-sums the per-method rows exactly.
    #[test]
    fn prop_settlement_rows_balance(
        openings in prop::collection::vec(0i64..1_000_000, 1..6),
        amounts in prop::collection::vec(0i64..100_000, 0..30),
    ) {
        let methods: Vec<PaymentMethodRef> =
            (0..openings.len()).map(|i| method(&format!("m{i}"))).collect();
        let opening_map: HashMap<Uuid, Decimal> = methods
            .iter()
            .zip(&openings)
            .map(|(m, &o)| (m.id, Decimal::from(o)))
            .collect();
        let payments: Vec<PaymentRow> = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| payment(&methods[i % methods.len()], Decimal::from(a)))
            .collect();

        let report = CashSettlementService::build_daily_settlement(
            settlement_date(),
            Uuid::new_v4(),
            "Downtown".to_string(),
            &methods,
            &opening_map,
            payments,
        );

        let mut opening_sum = Decimal::ZERO;
        let mut received_sum = Decimal::ZERO;
        let mut closing_sum = Decimal::ZERO;
        for row in &report.by_method {
            prop_assert_eq!(row.closing_balance, row.opening_balance + row.received_amount);
            opening_sum += row.opening_balance;
            received_sum += row.received_amount;
            closing_sum += row.closing_balance;
        }

        prop_assert_eq!(report.totals.total_opening, opening_sum);
        prop_assert_eq!(report.totals.total_received, received_sum);
        prop_assert_eq!(report.totals.total_closing, closing_sum);
        // Every payment lands on exactly one active method.
        let received_total: Decimal = amounts.iter().map(|&a| Decimal::from(a)).sum();
        prop_assert_eq!(report.totals.total_received, received_total);
    }
}
