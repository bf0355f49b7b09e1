use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::calendar::BusinessClock;
use crate::core::currency::format_amount;
use crate::core::Result;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::reports::models::{AnalyticsView, Dashboard, FinancialSummary};
use crate::modules::students::models::{Student, StudentResponse};
use crate::modules::students::repositories::StudentRepository;
use crate::modules::students::services::load_students;

use super::aggregation::{self, available_years, has_data_for_year, summarize};
use super::chart_adapters::{analytics_view, student_count_pie};
use super::export::{export_report, ReportFile};

/// Students previewed on the dashboard
pub const DASHBOARD_STUDENT_PREVIEW: usize = 4;

/// Recent payments on the dashboard
pub const DASHBOARD_RECENT_PAYMENTS: usize = 5;

/// Runs the aggregation engine over the current records.
///
/// Every call reloads the full record set; nothing is cached between calls.
pub struct ReportService {
    student_repo: Arc<dyn StudentRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    clock: BusinessClock,
    opening_balance: Decimal,
}

impl ReportService {
    pub fn new(
        student_repo: Arc<dyn StudentRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        clock: BusinessClock,
        opening_balance: Decimal,
    ) -> Self {
        Self {
            student_repo,
            payment_repo,
            clock,
            opening_balance,
        }
    }

    async fn students(&self) -> Result<Vec<Student>> {
        load_students(self.student_repo.as_ref(), self.payment_repo.as_ref()).await
    }

    pub async fn summary(&self) -> Result<FinancialSummary> {
        let students = self.students().await?;
        Ok(summarize(&students, self.clock.today()))
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let today = self.clock.today();
        let students = self.students().await?;
        let summary = summarize(&students, today);
        let with_opening = summary.total_revenue + self.opening_balance;
        let class_load = student_count_pie(&summary);

        Ok(Dashboard {
            total_students: students.len(),
            active_students: students.iter().filter(|s| s.is_active(today)).count(),
            monthly_revenue: summary.monthly_revenue,
            yearly_revenue: summary.yearly_revenue,
            total_revenue: summary.total_revenue,
            opening_balance: self.opening_balance,
            total_revenue_with_opening_balance: with_opening,
            total_revenue_display: format_amount(with_opening),
            student_counts: summary.student_counts,
            class_load,
            recent_payments: aggregation::recent_payments(&students, DASHBOARD_RECENT_PAYMENTS),
            students: students
                .iter()
                .take(DASHBOARD_STUDENT_PREVIEW)
                .cloned()
                .map(|s| StudentResponse::from_student(s, today))
                .collect(),
        })
    }

    pub async fn available_years(&self) -> Result<Vec<i32>> {
        let students = self.students().await?;
        Ok(available_years(&students, self.clock.today()))
    }

    /// Analytics for `year`, the current year when not given
    pub async fn analytics(&self, year: Option<i32>) -> Result<AnalyticsView> {
        let today = self.clock.today();
        let year = year.unwrap_or_else(|| today.year());
        let students = self.students().await?;

        let view = analytics_view(&students, year, today);
        if !view.has_data {
            warn!(year, "No revenue data for selected year");
        }

        Ok(view)
    }

    pub async fn export(&self, year: Option<i32>) -> Result<ReportFile> {
        let today = self.clock.today();
        let year = year.unwrap_or_else(|| today.year());
        let students = self.students().await?;

        if !has_data_for_year(&students, year) {
            warn!(year, "Exporting financial report for a year with no data");
        }

        let report = export_report(&students, year, today)?;
        info!(
            filename = %report.filename,
            students = students.len(),
            "Financial report exported"
        );

        Ok(report)
    }
}

// Service-level tests run against in-memory repositories
// See tests/integration/report_api_test.rs
