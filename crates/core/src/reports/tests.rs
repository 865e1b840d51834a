//! Tests for the report aggregation module.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::ReportService;
use super::types::{NamedRef, PaymentMethodRef, PaymentRow, ServiceRow, ServiceStatus};

fn named(name: &str) -> NamedRef {
    NamedRef {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap()
}

fn service(status: ServiceStatus) -> ServiceRow {
    ServiceRow {
        id: Uuid::new_v4(),
        ticket_number: "T-0001".to_string(),
        status,
        estimated_cost: None,
        actual_cost: None,
        created_at: at(9),
        completed_at: None,
        booked_by: None,
        technician: None,
        brand: None,
        faults: Vec::new(),
    }
}

fn booked(user: &NamedRef, actual: Option<Decimal>, estimated: Option<Decimal>) -> ServiceRow {
    ServiceRow {
        actual_cost: actual,
        estimated_cost: estimated,
        booked_by: Some(user.clone()),
        ..service(ServiceStatus::Received)
    }
}

fn payment(method: &PaymentMethodRef, amount: Decimal, hour: u32) -> PaymentRow {
    PaymentRow {
        id: Uuid::new_v4(),
        amount,
        paid_at: at(hour),
        method_id: method.id,
        method_name: method.name.clone(),
        service_id: None,
        ticket_number: None,
        customer_name: None,
        notes: None,
        transaction_id: None,
    }
}

// ============================================================================
// Revenue fallback and averages
// ============================================================================

#[test]
fn test_revenue_falls_back_from_actual_to_estimated_to_zero() {
    let user = named("Dana");
    let report = ReportService::generate_booking_report(vec![
        booked(&user, None, Some(dec!(500))),
        booked(&user, Some(dec!(700)), Some(dec!(500))),
        booked(&user, None, None),
    ]);

    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].service_count, 3);
    assert_eq!(report.summary[0].total_revenue, dec!(1200));
}

#[test]
fn test_booking_average_is_total_over_count() {
    let user = named("Dana");
    let report = ReportService::generate_booking_report(vec![
        booked(&user, Some(dec!(100)), None),
        booked(&user, Some(dec!(200)), None),
        booked(&user, Some(dec!(300)), None),
    ]);

    assert_eq!(report.summary[0].total_revenue, dec!(600));
    assert_eq!(report.summary[0].avg_per_service, dec!(200));
    assert_eq!(report.totals.total_revenue, dec!(600));
    assert_eq!(report.totals.avg_per_service, dec!(200));
}

#[test]
fn test_booking_report_skips_rows_without_a_booking_user() {
    let user = named("Dana");
    let report = ReportService::generate_booking_report(vec![
        booked(&user, Some(dec!(100)), None),
        service(ServiceStatus::Received), // no booked_by
    ]);

    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.totals.service_count, 1);
    assert_eq!(report.totals.total_revenue, dec!(100));
    // The detail list still carries every input row.
    assert_eq!(report.details.len(), 2);
}

// ============================================================================
// Technician buckets and completion time
// ============================================================================

#[rstest]
#[case(ServiceStatus::Cancelled)]
#[case(ServiceStatus::NotServiceable)]
fn test_terminated_rows_never_reach_technician_buckets(#[case] status: ServiceStatus) {
    let tech = named("Riley");
    let mut terminated = service(status);
    terminated.technician = Some(tech.clone());
    terminated.actual_cost = Some(dec!(900));
    let mut pending = service(ServiceStatus::InProgress);
    pending.technician = Some(tech.clone());
    pending.actual_cost = Some(dec!(150));

    let report = ReportService::generate_technician_report(vec![terminated, pending]);

    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].completed_count, 0);
    assert_eq!(report.summary[0].pending_count, 1);
    assert_eq!(report.summary[0].total_revenue, dec!(150));
    // Totals also exclude the terminated row.
    assert_eq!(report.totals.service_count, 1);
    assert_eq!(report.totals.total_revenue, dec!(150));
}

#[test]
fn test_completion_hours_average() {
    let tech = named("Riley");
    let mut completed = service(ServiceStatus::Completed);
    completed.technician = Some(tech.clone());
    completed.created_at = at(9);
    completed.completed_at = Some(at(9) + Duration::hours(2));

    let report = ReportService::generate_technician_report(vec![completed]);

    assert_eq!(report.summary[0].completed_count, 1);
    assert_eq!(report.summary[0].avg_completion_hours, Some(dec!(2)));
}

#[test]
fn test_completion_hours_divide_over_all_completed_rows() {
    let tech = named("Riley");
    let mut timed = service(ServiceStatus::Completed);
    timed.technician = Some(tech.clone());
    timed.created_at = at(9);
    timed.completed_at = Some(at(9) + Duration::hours(2));
    let mut untimed = service(ServiceStatus::Delivered);
    untimed.technician = Some(tech.clone());

    let report = ReportService::generate_technician_report(vec![timed, untimed]);

    // The untimed row adds nothing to the summed duration but still counts
    // in the denominator: 2 hours over 2 completed rows.
    assert_eq!(report.summary[0].completed_count, 2);
    assert_eq!(report.summary[0].avg_completion_hours, Some(dec!(1)));
}

#[test]
fn test_completion_hours_none_without_completion_timestamp() {
    let tech = named("Riley");
    let mut completed = service(ServiceStatus::Delivered);
    completed.technician = Some(tech.clone());
    completed.completed_at = None;

    let report = ReportService::generate_technician_report(vec![completed]);

    assert_eq!(report.summary[0].completed_count, 1);
    assert_eq!(report.summary[0].avg_completion_hours, None);
}

#[test]
fn test_technician_sort_is_revenue_descending_and_stable() {
    let first = named("A");
    let second = named("B");
    let third = named("C");
    let mut rows = Vec::new();
    for (tech, amount) in [
        (&first, dec!(300)),
        (&second, dec!(300)),
        (&third, dec!(100)),
    ] {
        let mut row = service(ServiceStatus::InProgress);
        row.technician = Some(tech.clone());
        row.actual_cost = Some(amount);
        rows.push(row);
    }

    let report = ReportService::generate_technician_report(rows);

    let order: Vec<&str> = report
        .summary
        .iter()
        .map(|row| row.user.name.as_str())
        .collect();
    // Both 300-revenue technicians keep their first-seen order.
    assert_eq!(order, vec!["A", "B", "C"]);
}

// ============================================================================
// Brand and fault groupings
// ============================================================================

#[test]
fn test_brand_report_sorts_by_service_count() {
    let apple = named("Apple");
    let samsung = named("Samsung");
    let mut rows = Vec::new();
    for brand in [&apple, &samsung, &samsung] {
        let mut row = service(ServiceStatus::Received);
        row.brand = Some(brand.clone());
        row.actual_cost = Some(dec!(50));
        rows.push(row);
    }
    // Row with no brand is skipped from grouping and totals.
    rows.push(service(ServiceStatus::Received));

    let report = ReportService::generate_brand_report(rows);

    assert_eq!(report.summary.len(), 2);
    assert_eq!(report.summary[0].brand.name, "Samsung");
    assert_eq!(report.summary[0].service_count, 2);
    assert_eq!(report.totals.service_count, 3);
}

#[test]
fn test_fault_fan_out_counts_revenue_once_in_totals() {
    let screen = named("Broken screen");
    let battery = named("Battery");
    let mut row = service(ServiceStatus::Received);
    row.actual_cost = Some(dec!(400));
    row.faults = vec![screen.clone(), battery.clone()];

    let report = ReportService::generate_fault_report(vec![row]);

    assert_eq!(report.summary.len(), 2);
    for group in &report.summary {
        assert_eq!(group.service_count, 1);
        assert_eq!(group.total_revenue, dec!(400));
    }
    // Totals come from the flat list, not from summing group totals.
    assert_eq!(report.totals.service_count, 1);
    assert_eq!(report.totals.total_revenue, dec!(400));
}

#[test]
fn test_service_without_faults_is_excluded_from_fault_report() {
    let report = ReportService::generate_fault_report(vec![service(ServiceStatus::Received)]);

    assert!(report.summary.is_empty());
    assert_eq!(report.totals.service_count, 0);
    assert_eq!(report.totals.total_revenue, Decimal::ZERO);
}

// ============================================================================
// Transactions breakdown
// ============================================================================

#[test]
fn test_inactive_method_is_absent_from_breakdown_but_counted_in_totals() {
    let cash = PaymentMethodRef {
        id: Uuid::new_v4(),
        name: "Cash".to_string(),
    };
    let retired = PaymentMethodRef {
        id: Uuid::new_v4(),
        name: "Cheque".to_string(),
    };

    let payments = vec![
        payment(&cash, dec!(100), 10),
        payment(&retired, dec!(40), 11),
    ];
    let report = ReportService::generate_transactions_report(payments, &[cash.clone()]);

    assert_eq!(report.by_method.len(), 1);
    assert_eq!(report.by_method[0].method.id, cash.id);
    assert_eq!(report.by_method[0].total_amount, dec!(100));
    // The retired method's payment still shows in details and totals.
    assert_eq!(report.details.len(), 2);
    assert_eq!(report.totals.transaction_count, 2);
    assert_eq!(report.totals.total_amount, dec!(140));
}

#[test]
fn test_every_active_method_gets_a_row_even_with_no_payments() {
    let cash = PaymentMethodRef {
        id: Uuid::new_v4(),
        name: "Cash".to_string(),
    };
    let card = PaymentMethodRef {
        id: Uuid::new_v4(),
        name: "Card".to_string(),
    };

    let report = ReportService::generate_transactions_report(
        vec![payment(&cash, dec!(25), 9)],
        &[cash.clone(), card.clone()],
    );

    assert_eq!(report.by_method.len(), 2);
    assert_eq!(report.by_method[1].method.id, card.id);
    assert_eq!(report.by_method[1].transaction_count, 0);
    assert_eq!(report.by_method[1].total_amount, Decimal::ZERO);
}

#[test]
fn test_day_breakdown_is_ascending() {
    let cash = PaymentMethodRef {
        id: Uuid::new_v4(),
        name: "Cash".to_string(),
    };
    let mut late = payment(&cash, dec!(10), 9);
    late.paid_at = Utc.with_ymd_and_hms(2024, 1, 12, 9, 0, 0).unwrap();
    let early = payment(&cash, dec!(20), 9);

    let report = ReportService::generate_transactions_report(vec![late, early], &[cash]);

    assert_eq!(report.by_day.len(), 2);
    assert!(report.by_day[0].day < report.by_day[1].day);
    assert_eq!(report.by_day[0].total_amount, dec!(20));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// When every service has a booking user, group counts and revenues sum
    /// exactly to the report totals.
    #[test]
    fn prop_booking_groups_partition_the_rows(
        amounts in prop::collection::vec(0i64..1_000_000, 1..40),
        user_count in 1usize..6,
    ) {
        let users: Vec<NamedRef> = (0..user_count).map(|i| named(&format!("u{i}"))).collect();
        let rows: Vec<ServiceRow> = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| booked(&users[i % user_count], Some(Decimal::from(a)), None))
            .collect();

        let expected_total: Decimal = amounts.iter().map(|&a| Decimal::from(a)).sum();
        let report = ReportService::generate_booking_report(rows);

        let group_count: u64 = report.summary.iter().map(|g| g.service_count).sum();
        let group_revenue: Decimal = report.summary.iter().map(|g| g.total_revenue).sum();

        prop_assert_eq!(group_count, amounts.len() as u64);
        prop_assert_eq!(group_revenue, expected_total);
        prop_assert_eq!(report.totals.total_revenue, expected_total);
    }

    /// Fault fan-out may inflate group totals but never report totals: the
    /// sum over groups is the per-service revenue weighted by tag count.
    #[test]
    fn prop_fault_group_sum_weights_revenue_by_tag_count(
        rows in prop::collection::vec((0i64..100_000, 1usize..4), 1..20),
    ) {
        let services: Vec<ServiceRow> = rows
            .iter()
            .map(|&(amount, fault_count)| {
                let mut row = service(ServiceStatus::Received);
                row.actual_cost = Some(Decimal::from(amount));
                row.faults = (0..fault_count).map(|i| named(&format!("f{i}"))).collect();
                row
            })
            .collect();

        let flat_total: Decimal = rows.iter().map(|&(a, _)| Decimal::from(a)).sum();
        let weighted_total: Decimal = rows
            .iter()
            .map(|&(a, n)| Decimal::from(a) * Decimal::from(n as u64))
            .sum();

        let report = ReportService::generate_fault_report(services);
        let group_revenue: Decimal = report.summary.iter().map(|g| g.total_revenue).sum();

        prop_assert_eq!(group_revenue, weighted_total);
        prop_assert_eq!(report.totals.total_revenue, flat_total);
    }

    /// The day breakdown always re-sums to the grand totals.
    #[test]
    fn prop_day_breakdown_sums_to_totals(
        amounts in prop::collection::vec(0i64..1_000_000, 0..30),
    ) {
        let cash = PaymentMethodRef { id: Uuid::new_v4(), name: "Cash".to_string() };
        let payments: Vec<PaymentRow> = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let mut p = payment(&cash, Decimal::from(a), 9);
                p.paid_at = at(9) + Duration::days((i % 5) as i64);
                p
            })
            .collect();

        let report = ReportService::generate_transactions_report(payments, &[cash]);

        let day_count: u64 = report.by_day.iter().map(|d| d.transaction_count).sum();
        let day_amount: Decimal = report.by_day.iter().map(|d| d.total_amount).sum();

        prop_assert_eq!(day_count, report.totals.transaction_count);
        prop_assert_eq!(day_amount, report.totals.total_amount);
    }
}
