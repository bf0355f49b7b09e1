// Aggregation engine: pure roll-ups over a loaded batch of students.
//
// Nothing here does I/O or reads the clock. Dates arrive already parsed, so
// a malformed record fails while loading and never reaches these functions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::core::calendar::{is_same_month, MONTH_ABBREVIATIONS};
use crate::modules::payments::models::PaymentMethod;
use crate::modules::reports::models::{
    ClassRevenue, FinancialSummary, MonthlyAmount, RecentPayment, StudentTotal,
};
use crate::modules::students::models::{ClassType, Student};

pub const DEFAULT_TOP_STUDENTS: usize = 5;

/// Years always offered in the year picker, counting back from the current one
const YEAR_FLOOR_SPAN: i32 = 2;

fn accumulate(
    summary: &mut FinancialSummary,
    amount: Decimal,
    date: NaiveDate,
    method: PaymentMethod,
    today: NaiveDate,
) {
    summary.total_revenue += amount;
    if is_same_month(date, today) {
        summary.monthly_revenue += amount;
    }
    if date.year() == today.year() {
        summary.yearly_revenue += amount;
    }
    *summary.payments_by_method.entry(method).or_insert(Decimal::ZERO) += amount;
}

/// Totals, current month/year revenue, class load and per-method revenue.
///
/// Each student's fee counts at its start date under its own method; each
/// history entry counts at its own date and method. Completed students add
/// revenue but not class load.
pub fn summarize(students: &[Student], today: NaiveDate) -> FinancialSummary {
    let mut summary = FinancialSummary::empty();

    for student in students {
        accumulate(
            &mut summary,
            student.payment,
            student.start_date,
            student.payment_method,
            today,
        );

        if student.is_active(today) || student.is_upcoming(today) {
            *summary.student_counts.entry(student.class_type).or_insert(0) += 1;
        }

        for payment in &student.payment_history {
            accumulate(&mut summary, payment.amount, payment.date, payment.method, today);
        }
    }

    summary
}

/// Twelve buckets, Jan..Dec, of fees and payments dated in `year`
pub fn generate_monthly_data(students: &[Student], year: i32) -> Vec<MonthlyAmount> {
    let mut buckets = [Decimal::ZERO; 12];

    for student in students {
        if student.start_date.year() == year {
            buckets[student.start_date.month0() as usize] += student.payment;
        }
        for payment in &student.payment_history {
            if payment.date.year() == year {
                buckets[payment.date.month0() as usize] += payment.amount;
            }
        }
    }

    MONTH_ABBREVIATIONS
        .into_iter()
        .zip(buckets)
        .map(|(month, amount)| MonthlyAmount { month, amount })
        .collect()
}

/// Revenue per class type, in declaration order.
///
/// History entries are attributed to the class of the first student whose
/// record id matches `payment.student_id`; unmatched entries are skipped.
pub fn generate_class_type_data(students: &[Student]) -> Vec<ClassRevenue> {
    let mut revenue: BTreeMap<ClassType, Decimal> =
        ClassType::ALL.into_iter().map(|c| (c, Decimal::ZERO)).collect();

    for student in students {
        *revenue.entry(student.class_type).or_insert(Decimal::ZERO) += student.payment;
    }

    for payment in students.iter().flat_map(|s| &s.payment_history) {
        if let Some(owner) = students.iter().find(|s| s.id == payment.student_id) {
            *revenue.entry(owner.class_type).or_insert(Decimal::ZERO) += payment.amount;
        }
    }

    revenue
        .into_iter()
        .map(|(class_type, revenue)| ClassRevenue {
            class_type,
            revenue,
        })
        .collect()
}

/// Highest-paying students, fee plus own payments, at most `limit`.
///
/// Records sharing an id are merged under the first name seen. Ties keep
/// input order.
pub fn generate_top_students_data(students: &[Student], limit: usize) -> Vec<StudentTotal> {
    let mut totals: Vec<(&str, StudentTotal)> = Vec::new();

    for student in students {
        let amount = student.total_paid();

        match totals.iter_mut().find(|(id, _)| *id == student.id) {
            Some((_, entry)) => entry.amount += amount,
            None => totals.push((
                student.id.as_str(),
                StudentTotal {
                    name: student.name.clone(),
                    amount,
                },
            )),
        }
    }

    let mut ranked: Vec<StudentTotal> = totals.into_iter().map(|(_, t)| t).collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(limit);
    ranked
}

/// Distinct years with data plus the current and two previous years, newest first
pub fn available_years(students: &[Student], today: NaiveDate) -> Vec<i32> {
    let current = today.year();
    let mut years: BTreeSet<i32> = (current - YEAR_FLOOR_SPAN..=current).collect();

    for student in students {
        years.insert(student.start_date.year());
        years.extend(student.payment_history.iter().map(|p| p.date.year()));
    }

    years.into_iter().rev().collect()
}

pub fn has_data_for_year(students: &[Student], year: i32) -> bool {
    students.iter().any(|s| {
        s.start_date.year() == year || s.payment_history.iter().any(|p| p.date.year() == year)
    })
}

/// Latest history entries across all students, newest first
pub fn recent_payments(students: &[Student], limit: usize) -> Vec<RecentPayment> {
    let mut entries: Vec<RecentPayment> = students
        .iter()
        .flat_map(|student| {
            student.payment_history.iter().map(move |p| RecentPayment {
                payment_id: p.id.clone(),
                student_id: p.student_id.clone(),
                student_name: student.name.clone(),
                amount: p.amount,
                date: p.date,
                method: p.method,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}
