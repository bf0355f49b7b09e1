use rust_decimal::Decimal;
use serde::Serialize;

use super::financial_summary::RecentPayment;
use crate::modules::students::models::{ClassType, StudentResponse};

/// Pie-chart slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: Decimal,
}

/// Bar-chart bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub name: String,
    pub amount: Decimal,
}

/// Everything the analytics page draws for one year
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub year: i32,
    pub available_years: Vec<i32>,
    pub has_data: bool,
    pub monthly_revenue: Vec<BarPoint>,
    pub class_revenue: Vec<ChartPoint>,
    pub top_students: Vec<BarPoint>,
    /// Methods with a positive amount in `year` only
    pub payment_methods: Vec<BarPoint>,
}

/// Cards on the landing page
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_students: usize,
    pub active_students: usize,
    pub monthly_revenue: Decimal,
    pub yearly_revenue: Decimal,
    pub total_revenue: Decimal,
    pub opening_balance: Decimal,
    pub total_revenue_with_opening_balance: Decimal,
    /// `total_revenue_with_opening_balance` as shown on the card
    pub total_revenue_display: String,
    pub student_counts: std::collections::BTreeMap<ClassType, u32>,
    /// `student_counts` as pie slices
    pub class_load: Vec<ChartPoint>,
    pub recent_payments: Vec<RecentPayment>,
    pub students: Vec<StudentResponse>,
}
