// Property-based tests for the aggregation engine
//
// Totals must reconcile across every breakdown regardless of how records are
// spread over dates, classes and payment methods.

use chrono::{Datelike, NaiveDate};
use classbook::payments::models::{Payment, PaymentMethod};
use classbook::reports::services::aggregation::{
    available_years, generate_class_type_data, generate_monthly_data,
    generate_top_students_data, summarize,
};
use classbook::students::models::{ClassType, Student};
use proptest::prelude::*;
use rust_decimal::Decimal;

const TODAY: (i32, u32, u32) = (2025, 6, 15);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2018i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop::sample::select(PaymentMethod::ALL.to_vec())
}

fn class_strategy() -> impl Strategy<Value = ClassType> {
    prop::sample::select(ClassType::ALL.to_vec())
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..500_000, 0u32..=2).prop_map(|(units, scale)| Decimal::new(units, scale))
}

type PaymentSeed = (Decimal, NaiveDate, PaymentMethod);

fn student_strategy() -> impl Strategy<Value = (Decimal, NaiveDate, PaymentMethod, ClassType, Vec<PaymentSeed>)> {
    (
        amount_strategy(),
        date_strategy(),
        method_strategy(),
        class_strategy(),
        prop::collection::vec((amount_strategy(), date_strategy(), method_strategy()), 0..4),
    )
}

/// Students with distinct record ids and histories owned by themselves
fn students_strategy() -> impl Strategy<Value = Vec<Student>> {
    prop::collection::vec(student_strategy(), 0..12).prop_map(|seeds| {
        seeds
            .into_iter()
            .enumerate()
            .map(|(i, (fee, start, method, class_type, payments))| {
                let id = format!("stu-{}", i);
                Student {
                    student_id: format!("ST-{}", i),
                    name: format!("Student {}", i),
                    serial_number: i as i32 + 1,
                    start_date: start,
                    end_date: None,
                    payment: fee,
                    payment_method: method,
                    class_type,
                    class_time: None,
                    class_section: None,
                    picture_url: None,
                    payment_history: payments
                        .into_iter()
                        .enumerate()
                        .map(|(j, (amount, date, method))| Payment {
                            id: format!("{}-pay-{}", id, j),
                            student_id: id.clone(),
                            amount,
                            date,
                            method,
                        })
                        .collect(),
                    id,
                }
            })
            .collect()
    })
}

fn grand_total(students: &[Student]) -> Decimal {
    students.iter().map(|s| s.total_paid()).sum()
}

proptest! {
    #[test]
    fn total_revenue_is_sum_of_fees_and_payments(students in students_strategy()) {
        let summary = summarize(&students, today());
        prop_assert_eq!(summary.total_revenue, grand_total(&students));
    }

    #[test]
    fn method_breakdown_reconciles_with_total(students in students_strategy()) {
        let summary = summarize(&students, today());
        let by_method: Decimal = summary.payments_by_method.values().copied().sum();
        prop_assert_eq!(by_method, summary.total_revenue);
        prop_assert_eq!(summary.payments_by_method.len(), PaymentMethod::ALL.len());
    }

    #[test]
    fn period_revenue_never_exceeds_total(students in students_strategy()) {
        let summary = summarize(&students, today());
        prop_assert!(summary.monthly_revenue <= summary.yearly_revenue);
        prop_assert!(summary.yearly_revenue <= summary.total_revenue);
    }

    #[test]
    fn class_breakdown_reconciles_with_total(students in students_strategy()) {
        let classes = generate_class_type_data(&students);
        let sum: Decimal = classes.iter().map(|c| c.revenue).sum();
        prop_assert_eq!(classes.len(), ClassType::ALL.len());
        prop_assert_eq!(sum, grand_total(&students));
    }

    #[test]
    fn monthly_data_has_twelve_ordered_buckets(students in students_strategy(), year in 2018i32..=2027) {
        let months = generate_monthly_data(&students, year);
        prop_assert_eq!(months.len(), 12);
        prop_assert_eq!(months[0].month, "Jan");
        prop_assert_eq!(months[11].month, "Dec");

        let expected: Decimal = students
            .iter()
            .map(|s| {
                let fee = if s.start_date.year() == year { s.payment } else { Decimal::ZERO };
                let paid: Decimal = s
                    .payment_history
                    .iter()
                    .filter(|p| p.date.year() == year)
                    .map(|p| p.amount)
                    .sum();
                fee + paid
            })
            .sum();
        let actual: Decimal = months.iter().map(|m| m.amount).sum();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn available_years_include_floor_and_are_unique(students in students_strategy()) {
        let years = available_years(&students, today());
        let current = today().year();

        for y in current - 2..=current {
            prop_assert!(years.contains(&y));
        }
        prop_assert!(years.windows(2).all(|w| w[0] > w[1]));
        for s in &students {
            prop_assert!(years.contains(&s.start_date.year()));
        }
    }

    #[test]
    fn top_students_are_bounded_and_descending(students in students_strategy(), limit in 0usize..8) {
        let top = generate_top_students_data(&students, limit);
        prop_assert_eq!(top.len(), students.len().min(limit));
        prop_assert!(top.windows(2).all(|w| w[0].amount >= w[1].amount));

        let best = students.iter().map(|s| s.total_paid()).max();
        if let (Some(first), Some(best)) = (top.first(), best) {
            prop_assert_eq!(first.amount, best);
        }
    }
}

#[test]
fn test_empty_input_yields_zeroed_breakdowns() {
    let summary = summarize(&[], today());
    assert_eq!(summary.total_revenue, Decimal::ZERO);
    assert!(summary.student_counts.values().all(|c| *c == 0));
    assert!(generate_top_students_data(&[], 5).is_empty());
    assert_eq!(available_years(&[], today()), vec![2025, 2024, 2023]);
}
