//! Report generation service.
//!
//! Every generator takes a flat, pre-filtered vector of rows, groups it in
//! memory, and returns the summary plus the untouched detail list. Groups
//! are only materialized when at least one row lands in them, so per-group
//! averages never divide by zero. Sorts are stable: ties keep the order in
//! which groups were first seen.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{
    BookingReport, BookingSummaryRow, BrandReport, BrandSummaryRow, DayBreakdownRow, FaultReport,
    FaultSummaryRow, MethodBreakdownRow, NamedRef, PaymentMethodRef, PaymentRow, ReportTotals,
    ServiceRow, TechnicianReport, TechnicianSummaryRow, TransactionTotals, TransactionsReport,
};

/// Milliseconds per hour, for completion-time averages.
const MS_PER_HOUR: i64 = 3_600_000;

/// Service for generating operational reports.
pub struct ReportService;

impl ReportService {
    /// Generates the booking-person report.
    ///
    /// Services with no booking user are skipped.
    #[must_use]
    pub fn generate_booking_report(services: Vec<ServiceRow>) -> BookingReport {
        let mut groups: Vec<(NamedRef, u64, Decimal)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for row in &services {
            let Some(user) = &row.booked_by else {
                continue;
            };
            let slot = *index.entry(user.id).or_insert_with(|| {
                groups.push((user.clone(), 0, Decimal::ZERO));
                groups.len() - 1
            });
            groups[slot].1 += 1;
            groups[slot].2 += row.revenue();
        }

        let mut summary: Vec<BookingSummaryRow> = groups
            .into_iter()
            .map(|(user, count, revenue)| BookingSummaryRow {
                user,
                service_count: count,
                total_revenue: revenue,
                avg_per_service: average(revenue, count),
            })
            .collect();
        summary.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

        let totals = service_totals(&services, |row| row.booked_by.is_some());

        BookingReport {
            summary,
            details: services,
            totals,
        }
    }

    /// Generates the technician report.
    ///
    /// Unassigned services are skipped; cancelled and not-serviceable rows
    /// are dropped from both the completed and pending buckets.
    #[must_use]
    pub fn generate_technician_report(services: Vec<ServiceRow>) -> TechnicianReport {
        struct Acc {
            user: NamedRef,
            completed: u64,
            pending: u64,
            revenue: Decimal,
            completion_ms: i64,
            completed_with_time: u64,
        }

        let mut groups: Vec<Acc> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for row in &services {
            if row.status.is_terminated() {
                continue;
            }
            let Some(user) = &row.technician else {
                continue;
            };
            let slot = *index.entry(user.id).or_insert_with(|| {
                groups.push(Acc {
                    user: user.clone(),
                    completed: 0,
                    pending: 0,
                    revenue: Decimal::ZERO,
                    completion_ms: 0,
                    completed_with_time: 0,
                });
                groups.len() - 1
            });

            let acc = &mut groups[slot];
            acc.revenue += row.revenue();
            if row.status.is_completed() {
                acc.completed += 1;
                if let Some(completed_at) = row.completed_at {
                    acc.completion_ms += (completed_at - row.created_at).num_milliseconds();
                    acc.completed_with_time += 1;
                }
            } else {
                acc.pending += 1;
            }
        }

        let mut summary: Vec<TechnicianSummaryRow> = groups
            .into_iter()
            .map(|acc| {
                let count = acc.completed + acc.pending;
                TechnicianSummaryRow {
                    user: acc.user,
                    completed_count: acc.completed,
                    pending_count: acc.pending,
                    service_count: count,
                    total_revenue: acc.revenue,
                    avg_per_service: average(acc.revenue, count),
                    avg_completion_hours: average_completion_hours(
                        acc.completion_ms,
                        acc.completed_with_time,
                        acc.completed,
                    ),
                }
            })
            .collect();
        summary.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

        let totals = service_totals(&services, |row| {
            row.technician.is_some() && !row.status.is_terminated()
        });

        TechnicianReport {
            summary,
            details: services,
            totals,
        }
    }

    /// Generates the device-brand report.
    ///
    /// Services with no linked device or no brand are skipped.
    #[must_use]
    pub fn generate_brand_report(services: Vec<ServiceRow>) -> BrandReport {
        let mut groups: Vec<(NamedRef, u64, Decimal)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for row in &services {
            let Some(brand) = &row.brand else {
                continue;
            };
            let slot = *index.entry(brand.id).or_insert_with(|| {
                groups.push((brand.clone(), 0, Decimal::ZERO));
                groups.len() - 1
            });
            groups[slot].1 += 1;
            groups[slot].2 += row.revenue();
        }

        let mut summary: Vec<BrandSummaryRow> = groups
            .into_iter()
            .map(|(brand, count, revenue)| BrandSummaryRow {
                brand,
                service_count: count,
                total_revenue: revenue,
                avg_per_service: average(revenue, count),
            })
            .collect();
        summary.sort_by(|a, b| b.service_count.cmp(&a.service_count));

        let totals = service_totals(&services, |row| row.brand.is_some());

        BrandReport {
            summary,
            details: services,
            totals,
        }
    }

    /// Generates the fault-type report.
    ///
    /// A service contributes its full revenue to every fault it is tagged
    /// with; revenue is not split across faults. Totals are computed from
    /// the flat row list so each service counts once.
    #[must_use]
    pub fn generate_fault_report(services: Vec<ServiceRow>) -> FaultReport {
        let mut groups: Vec<(NamedRef, u64, Decimal)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for row in &services {
            let revenue = row.revenue();
            for fault in &row.faults {
                let slot = *index.entry(fault.id).or_insert_with(|| {
                    groups.push((fault.clone(), 0, Decimal::ZERO));
                    groups.len() - 1
                });
                groups[slot].1 += 1;
                groups[slot].2 += revenue;
            }
        }

        let mut summary: Vec<FaultSummaryRow> = groups
            .into_iter()
            .map(|(fault, count, revenue)| FaultSummaryRow {
                fault,
                service_count: count,
                total_revenue: revenue,
                avg_per_service: average(revenue, count),
            })
            .collect();
        summary.sort_by(|a, b| b.service_count.cmp(&a.service_count));

        let totals = service_totals(&services, |row| !row.faults.is_empty());

        FaultReport {
            summary,
            details: services,
            totals,
        }
    }

    /// Generates the transactions report over a date window.
    ///
    /// The per-method breakdown covers exactly the given active methods, in
    /// the given order, zero-filled where a method took no payments.
    /// Payments on methods outside that list (inactive ones) still count in
    /// the detail list and grand totals.
    #[must_use]
    pub fn generate_transactions_report(
        payments: Vec<PaymentRow>,
        active_methods: &[PaymentMethodRef],
    ) -> TransactionsReport {
        let mut by_method: Vec<MethodBreakdownRow> = active_methods
            .iter()
            .map(|method| MethodBreakdownRow {
                method: method.clone(),
                transaction_count: 0,
                total_amount: Decimal::ZERO,
            })
            .collect();
        let method_index: HashMap<Uuid, usize> = active_methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();

        let mut by_day: Vec<DayBreakdownRow> = Vec::new();
        let mut day_index = HashMap::new();
        let mut totals = TransactionTotals::default();

        for payment in &payments {
            if let Some(&slot) = method_index.get(&payment.method_id) {
                by_method[slot].transaction_count += 1;
                by_method[slot].total_amount += payment.amount;
            }

            let day = payment.paid_at.date_naive();
            let slot = *day_index.entry(day).or_insert_with(|| {
                by_day.push(DayBreakdownRow {
                    day,
                    transaction_count: 0,
                    total_amount: Decimal::ZERO,
                });
                by_day.len() - 1
            });
            by_day[slot].transaction_count += 1;
            by_day[slot].total_amount += payment.amount;

            totals.transaction_count += 1;
            totals.total_amount += payment.amount;
        }

        by_day.sort_by_key(|row| row.day);

        TransactionsReport {
            by_method,
            by_day,
            details: payments,
            totals,
        }
    }
}

/// Plain average; zero when the group is empty.
fn average(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Average completion time in hours across all completed rows. Rows without
/// a completion timestamp contribute nothing to the summed duration but
/// still count in the denominator; `None` when no completed row carries a
/// timestamp.
fn average_completion_hours(total_ms: i64, timed: u64, completed: u64) -> Option<Decimal> {
    if timed == 0 {
        return None;
    }
    Some(Decimal::from(total_ms) / Decimal::from(MS_PER_HOUR) / Decimal::from(completed))
}

/// Totals across rows matching the report's inclusion rule, each row
/// counted once.
fn service_totals<F>(services: &[ServiceRow], included: F) -> ReportTotals
where
    F: Fn(&ServiceRow) -> bool,
{
    let mut count: u64 = 0;
    let mut revenue = Decimal::ZERO;
    for row in services.iter().filter(|row| included(row)) {
        count += 1;
        revenue += row.revenue();
    }
    ReportTotals {
        service_count: count,
        total_revenue: revenue,
        avg_per_service: average(revenue, count),
    }
}
