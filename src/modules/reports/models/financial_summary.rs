use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::payments::models::PaymentMethod;
use crate::modules::students::models::ClassType;

/// Revenue roll-up over one batch of students.
///
/// Both maps always carry every key, zero when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    /// Fees and payments dated in the current calendar month
    pub monthly_revenue: Decimal,
    /// Fees and payments dated in the current calendar year
    pub yearly_revenue: Decimal,
    /// Active or upcoming students per class
    pub student_counts: BTreeMap<ClassType, u32>,
    pub payments_by_method: BTreeMap<PaymentMethod, Decimal>,
}

impl FinancialSummary {
    pub fn empty() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            monthly_revenue: Decimal::ZERO,
            yearly_revenue: Decimal::ZERO,
            student_counts: ClassType::ALL.into_iter().map(|c| (c, 0)).collect(),
            payments_by_method: PaymentMethod::ALL
                .into_iter()
                .map(|m| (m, Decimal::ZERO))
                .collect(),
        }
    }
}

/// One month of the yearly revenue series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAmount {
    /// `Jan`..`Dec`
    pub month: &'static str,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRevenue {
    pub class_type: ClassType,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentTotal {
    pub name: String,
    pub amount: Decimal,
}

/// A payment with the owning student's name, for the "recent payments" card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPayment {
    pub payment_id: String,
    pub student_id: String,
    pub student_name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
}
