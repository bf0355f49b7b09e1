use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::modules::payments::models::PaymentMethod;
use crate::modules::reports::models::{
    AnalyticsView, BarPoint, ChartPoint, ClassRevenue, FinancialSummary, MonthlyAmount,
    StudentTotal,
};
use crate::modules::students::models::Student;

use super::aggregation::{
    available_years, generate_class_type_data, generate_monthly_data, generate_top_students_data,
    has_data_for_year, DEFAULT_TOP_STUDENTS,
};

pub fn monthly_bars(months: Vec<MonthlyAmount>) -> Vec<BarPoint> {
    months
        .into_iter()
        .map(|m| BarPoint {
            name: m.month.to_string(),
            amount: m.amount,
        })
        .collect()
}

pub fn class_pie(classes: Vec<ClassRevenue>) -> Vec<ChartPoint> {
    classes
        .into_iter()
        .map(|c| ChartPoint {
            name: c.class_type.to_string(),
            value: c.revenue,
        })
        .collect()
}

pub fn top_student_bars(totals: Vec<StudentTotal>) -> Vec<BarPoint> {
    totals
        .into_iter()
        .map(|t| BarPoint {
            name: t.name,
            amount: t.amount,
        })
        .collect()
}

/// Class load pie from a summary
pub fn student_count_pie(summary: &FinancialSummary) -> Vec<ChartPoint> {
    summary
        .student_counts
        .iter()
        .map(|(class_type, count)| ChartPoint {
            name: class_type.to_string(),
            value: Decimal::from(*count),
        })
        .collect()
}

fn positive_bars(by_method: BTreeMap<PaymentMethod, Decimal>) -> Vec<BarPoint> {
    by_method
        .into_iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .map(|(method, amount)| BarPoint {
            name: method.to_string(),
            amount,
        })
        .collect()
}

/// Revenue per method for fees starting and payments dated in `year`.
/// Methods with no positive revenue are omitted.
pub fn payment_methods_for_year(students: &[Student], year: i32) -> Vec<BarPoint> {
    let mut by_method: BTreeMap<PaymentMethod, Decimal> = BTreeMap::new();

    for student in students {
        if student.start_date.year() == year {
            *by_method.entry(student.payment_method).or_insert(Decimal::ZERO) += student.payment;
        }
        for payment in &student.payment_history {
            if payment.date.year() == year {
                *by_method.entry(payment.method).or_insert(Decimal::ZERO) += payment.amount;
            }
        }
    }

    positive_bars(by_method)
}

/// Method bars over every record, as in the report's payment-method section
pub fn payment_method_bars(summary: &FinancialSummary) -> Vec<BarPoint> {
    positive_bars(summary.payments_by_method.clone())
}

pub fn analytics_view(students: &[Student], year: i32, today: NaiveDate) -> AnalyticsView {
    AnalyticsView {
        year,
        available_years: available_years(students, today),
        has_data: has_data_for_year(students, year),
        monthly_revenue: monthly_bars(generate_monthly_data(students, year)),
        class_revenue: class_pie(generate_class_type_data(students)),
        top_students: top_student_bars(generate_top_students_data(students, DEFAULT_TOP_STUDENTS)),
        payment_methods: payment_methods_for_year(students, year),
    }
}
